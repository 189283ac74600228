use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

/// How long an invitation stays acceptable after creation.
pub const INVITATION_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationState {
    Pending,
    Accepted,
    Expired,
}

impl Invitation {
    pub fn expiry_from(created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + Duration::days(INVITATION_TTL_DAYS)
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Acceptance is terminal and takes precedence over expiry.
    pub fn state(&self, now: DateTime<Utc>) -> InvitationState {
        if self.is_used() {
            InvitationState::Accepted
        } else if self.is_expired(now) {
            InvitationState::Expired
        } else {
            InvitationState::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(created_at: DateTime<Utc>) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            email: "bob@x.com".to_string(),
            token_hash: String::new(),
            role: Role::AdminEntreprise,
            created_at,
            expires_at: Invitation::expiry_from(created_at),
            used_at: None,
            created_by: None,
        }
    }

    #[test]
    fn fresh_invitation_is_pending() {
        let now = Utc::now();
        assert_eq!(invitation(now).state(now), InvitationState::Pending);
    }

    #[test]
    fn expires_after_seven_days() {
        let created = Utc::now();
        let inv = invitation(created);
        assert_eq!(inv.state(created + Duration::days(7)), InvitationState::Pending);
        assert_eq!(
            inv.state(created + Duration::days(7) + Duration::seconds(1)),
            InvitationState::Expired
        );
    }

    #[test]
    fn used_invitation_stays_accepted_after_expiry() {
        let created = Utc::now();
        let mut inv = invitation(created);
        inv.used_at = Some(created + Duration::hours(1));
        assert_eq!(inv.state(created + Duration::days(30)), InvitationState::Accepted);
        assert!(inv.is_expired(created + Duration::days(30)));
    }
}
