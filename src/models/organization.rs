use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Suspended,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub manager_last_name: Option<String>,
    pub manager_first_name: Option<String>,
    pub manager_email: Option<String>,
    pub manager_phone: Option<String>,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub subscription_status: SubscriptionStatus,
    pub last_reminder_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields a super admin may change. `None` keeps the stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub manager_last_name: Option<String>,
    pub manager_first_name: Option<String>,
    pub manager_email: Option<String>,
    pub manager_phone: Option<String>,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub subscription_status: Option<SubscriptionStatus>,
    pub last_reminder_at: Option<DateTime<Utc>>,
}

impl OrganizationChanges {
    /// Checks the changes against the organization they will be applied to.
    pub fn validate(&self, current: &Organization) -> Result<(), String> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty".to_string());
        }
        if self.email.as_deref().is_some_and(|e| !e.contains('@')) {
            return Err("email is invalid".to_string());
        }
        let start = self.subscription_start.or(current.subscription_start);
        let end = self.subscription_end.or(current.subscription_end);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err("subscriptionEnd must not precede subscriptionStart".to_string());
            }
        }
        Ok(())
    }
}
