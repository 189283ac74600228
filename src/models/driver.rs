use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "driver_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Active,
    Inactive,
    OnLeave,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Option<Uuid>,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub license_expires_at: Option<DateTime<Utc>>,
    pub assigned_vehicle_id: Option<Uuid>,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDriver {
    pub user_id: Option<Uuid>,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub license_expires_at: Option<DateTime<Utc>>,
    pub assigned_vehicle_id: Option<Uuid>,
    pub status: Option<DriverStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverChanges {
    pub user_id: Option<Uuid>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub license_expires_at: Option<DateTime<Utc>>,
    pub assigned_vehicle_id: Option<Uuid>,
    pub status: Option<DriverStatus>,
}

impl NewDriver {
    pub fn validate(&self) -> Result<(), String> {
        require_text(&[
            ("lastName", Some(&self.last_name)),
            ("firstName", Some(&self.first_name)),
            ("phone", Some(&self.phone)),
        ])
    }
}

impl DriverChanges {
    pub fn validate(&self) -> Result<(), String> {
        require_text(&[
            ("lastName", self.last_name.as_ref()),
            ("firstName", self.first_name.as_ref()),
            ("phone", self.phone.as_ref()),
        ])
    }
}

fn require_text(fields: &[(&str, Option<&String>)]) -> Result<(), String> {
    match fields
        .iter()
        .find(|(_, value)| value.is_some_and(|v| v.trim().is_empty()))
    {
        Some((field, _)) => Err(format!("{field} must not be empty")),
        None => Ok(()),
    }
}
