use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{check_money, checked_total};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub mileage: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFuelRecord {
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub total_cost: Option<Decimal>,
    pub mileage: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRecordChanges {
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub quantity: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub mileage: Option<i32>,
    pub notes: Option<String>,
}

impl NewFuelRecord {
    pub fn validate(&self) -> Result<(), String> {
        validate_amounts(Some(self.quantity), Some(self.unit_cost), self.total_cost, Some(self.mileage))?;
        self.total_cost().map(|_| ())
    }

    /// Explicit total, or quantity times unit cost rounded to cents.
    pub fn total_cost(&self) -> Result<Decimal, String> {
        match self.total_cost {
            Some(total) => Ok(total),
            None => checked_total(self.quantity, self.unit_cost),
        }
    }
}

impl FuelRecordChanges {
    pub fn validate(&self) -> Result<(), String> {
        validate_amounts(self.quantity, self.unit_cost, self.total_cost, self.mileage)
    }

    /// Total after applying the changes to `current`. A new quantity or unit
    /// cost without an explicit total recomputes it.
    pub fn merged_total(&self, current: &FuelRecord) -> Result<Decimal, String> {
        if let Some(total) = self.total_cost {
            return Ok(total);
        }
        if self.quantity.is_none() && self.unit_cost.is_none() {
            return Ok(current.total_cost);
        }
        checked_total(
            self.quantity.unwrap_or(current.quantity),
            self.unit_cost.unwrap_or(current.unit_cost),
        )
    }
}

fn validate_amounts(
    quantity: Option<Decimal>,
    unit_cost: Option<Decimal>,
    total_cost: Option<Decimal>,
    mileage: Option<i32>,
) -> Result<(), String> {
    if quantity.is_some_and(|q| q <= Decimal::ZERO) {
        return Err("quantity must be positive".to_string());
    }
    if unit_cost.is_some_and(|c| c < Decimal::ZERO) || total_cost.is_some_and(|c| c < Decimal::ZERO) {
        return Err("costs must not be negative".to_string());
    }
    for (field, value) in [("quantity", quantity), ("unitCost", unit_cost), ("totalCost", total_cost)] {
        if let Some(value) = value {
            check_money(field, value)?;
        }
    }
    if mileage.is_some_and(|m| m < 0) {
        return Err("mileage must not be negative".to_string());
    }
    Ok(())
}
