use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::check_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "maintenance_urgency", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceUrgency {
    Urgent,
    Soon,
    Scheduled,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub vehicle_id: Uuid,
    pub kind: String,
    pub description: Option<String>,
    pub planned_at: Option<DateTime<Utc>>,
    pub done_at: Option<DateTime<Utc>>,
    pub planned_mileage: Option<i32>,
    pub done_mileage: Option<i32>,
    pub cost: Option<Decimal>,
    pub urgency: MaintenanceUrgency,
    pub complete: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaintenanceRecord {
    pub vehicle_id: Uuid,
    pub kind: String,
    pub description: Option<String>,
    pub planned_at: Option<DateTime<Utc>>,
    pub done_at: Option<DateTime<Utc>>,
    pub planned_mileage: Option<i32>,
    pub done_mileage: Option<i32>,
    pub cost: Option<Decimal>,
    pub urgency: Option<MaintenanceUrgency>,
    pub complete: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceChanges {
    pub vehicle_id: Option<Uuid>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub planned_at: Option<DateTime<Utc>>,
    pub done_at: Option<DateTime<Utc>>,
    pub planned_mileage: Option<i32>,
    pub done_mileage: Option<i32>,
    pub cost: Option<Decimal>,
    pub urgency: Option<MaintenanceUrgency>,
    pub complete: Option<bool>,
    pub notes: Option<String>,
}

impl NewMaintenanceRecord {
    pub fn validate(&self) -> Result<(), String> {
        if self.kind.trim().is_empty() {
            return Err("kind must not be empty".to_string());
        }
        validate_numbers(self.cost, self.planned_mileage, self.done_mileage)
    }
}

impl MaintenanceChanges {
    pub fn validate(&self) -> Result<(), String> {
        if self.kind.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err("kind must not be empty".to_string());
        }
        validate_numbers(self.cost, self.planned_mileage, self.done_mileage)
    }
}

fn validate_numbers(
    cost: Option<Decimal>,
    planned_mileage: Option<i32>,
    done_mileage: Option<i32>,
) -> Result<(), String> {
    if cost.is_some_and(|c| c < Decimal::ZERO) {
        return Err("cost must not be negative".to_string());
    }
    if let Some(cost) = cost {
        check_money("cost", cost)?;
    }
    if planned_mileage.is_some_and(|m| m < 0) || done_mileage.is_some_and(|m| m < 0) {
        return Err("mileage must not be negative".to_string());
    }
    Ok(())
}
