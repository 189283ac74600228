use rust_decimal::Decimal;

/// Largest magnitude a `NUMERIC(10, 2)` column holds is just below this.
const MONEY_LIMIT: i64 = 100_000_000;

/// Checks that `value` fits a `NUMERIC(10, 2)` column: under 10^8 in
/// magnitude with at most two decimal places.
pub fn check_money(field: &str, value: Decimal) -> Result<(), String> {
    if value.abs() >= Decimal::from(MONEY_LIMIT) {
        return Err(format!("{field} must be less than 100000000"));
    }
    if value.normalize().scale() > 2 {
        return Err(format!("{field} must have at most two decimal places"));
    }
    Ok(())
}

/// `quantity * unit_cost` rounded to cents, or an error when it does not fit.
pub fn checked_total(quantity: Decimal, unit_cost: Decimal) -> Result<Decimal, String> {
    let total = quantity
        .checked_mul(unit_cost)
        .ok_or_else(|| "totalCost is out of range".to_string())?
        .round_dp(2);
    check_money("totalCost", total)?;
    Ok(total)
}
