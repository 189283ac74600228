use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::check_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub category: String,
    pub description: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: Option<DateTime<Utc>>,
    pub category: String,
    pub description: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionChanges {
    pub kind: Option<TransactionKind>,
    pub amount: Option<Decimal>,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(Some(self.amount), Some(&self.category))
    }
}

impl TransactionChanges {
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(self.amount, self.category.as_ref())
    }
}

fn validate_fields(amount: Option<Decimal>, category: Option<&String>) -> Result<(), String> {
    if amount.is_some_and(|a| a <= Decimal::ZERO) {
        return Err("amount must be positive".to_string());
    }
    if let Some(amount) = amount {
        check_money("amount", amount)?;
    }
    if category.is_some_and(|c| c.trim().is_empty()) {
        return Err("category must not be empty".to_string());
    }
    Ok(())
}
