use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::check_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

impl InvoiceStatus {
    /// Payment status implied by the amounts.
    pub fn from_amounts(total: Decimal, paid: Decimal) -> Self {
        if paid <= Decimal::ZERO {
            InvoiceStatus::Unpaid
        } else if paid < total {
            InvoiceStatus::PartiallyPaid
        } else {
            InvoiceStatus::Paid
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub client_id: Uuid,
    pub number: String,
    pub date: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub client_id: Uuid,
    pub number: String,
    pub date: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub total_amount: Decimal,
    pub paid_amount: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceChanges {
    pub client_id: Option<Uuid>,
    pub number: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub total_amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl NewInvoice {
    pub fn validate(&self) -> Result<(), String> {
        if self.number.trim().is_empty() {
            return Err("number must not be empty".to_string());
        }
        validate_amounts(self.total_amount, self.paid_amount.unwrap_or(Decimal::ZERO))
    }
}

impl InvoiceChanges {
    pub fn validate(&self) -> Result<(), String> {
        if self.number.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("number must not be empty".to_string());
        }
        Ok(())
    }

    /// Amounts after applying the changes to `current`, validated together.
    pub fn merged_amounts(&self, current: &Invoice) -> Result<(Decimal, Decimal), String> {
        let total = self.total_amount.unwrap_or(current.total_amount);
        let paid = self.paid_amount.unwrap_or(current.paid_amount);
        validate_amounts(total, paid)?;
        Ok((total, paid))
    }
}

fn validate_amounts(total: Decimal, paid: Decimal) -> Result<(), String> {
    if total < Decimal::ZERO || paid < Decimal::ZERO {
        return Err("amounts must not be negative".to_string());
    }
    check_money("totalAmount", total)?;
    check_money("paidAmount", paid)?;
    if paid > total {
        return Err("paidAmount must not exceed totalAmount".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_paid_amount() {
        let total = Decimal::new(10000, 2);
        assert_eq!(InvoiceStatus::from_amounts(total, Decimal::ZERO), InvoiceStatus::Unpaid);
        assert_eq!(
            InvoiceStatus::from_amounts(total, Decimal::new(2500, 2)),
            InvoiceStatus::PartiallyPaid
        );
        assert_eq!(InvoiceStatus::from_amounts(total, total), InvoiceStatus::Paid);
    }

    #[test]
    fn overpayment_is_rejected() {
        let invoice = NewInvoice {
            client_id: Uuid::nil(),
            number: "F-2024-001".to_string(),
            date: None,
            due_at: None,
            total_amount: Decimal::new(100, 0),
            paid_amount: Some(Decimal::new(150, 0)),
            notes: None,
        };
        assert!(invoice.validate().unwrap_err().contains("paidAmount"));
    }

    #[test]
    fn zero_total_with_no_payment_is_unpaid() {
        assert_eq!(
            InvoiceStatus::from_amounts(Decimal::ZERO, Decimal::ZERO),
            InvoiceStatus::Unpaid
        );
    }

    #[test]
    fn total_beyond_column_range_is_rejected() {
        let invoice = NewInvoice {
            client_id: Uuid::nil(),
            number: "F-2024-002".to_string(),
            date: None,
            due_at: None,
            total_amount: Decimal::from(1_000_000_000),
            paid_amount: None,
            notes: None,
        };
        assert!(invoice.validate().unwrap_err().contains("totalAmount"));
    }
}
