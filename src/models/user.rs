use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    AdminEntreprise,
    Gestionnaire,
    Chauffeur,
}

impl Role {
    /// Roles allowed to manage users and settings of their own organization.
    pub fn is_org_admin(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::AdminEntreprise)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::AdminEntreprise => "admin_entreprise",
            Role::Gestionnaire => "gestionnaire",
            Role::Chauffeur => "chauffeur",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub external_auth_id: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Trimmed, lower-cased form used for every email comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admins_manage_the_organization() {
        assert!(Role::SuperAdmin.is_org_admin());
        assert!(Role::AdminEntreprise.is_org_admin());
        assert!(!Role::Gestionnaire.is_org_admin());
        assert!(!Role::Chauffeur.is_org_admin());
    }

    #[test]
    fn roles_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&Role::AdminEntreprise).unwrap();
        assert_eq!(json, "\"admin_entreprise\"");
        let role: Role = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
        assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
    }

    #[test]
    fn email_normalization_ignores_case_and_padding() {
        assert_eq!(normalize_email("  Bob@X.com "), "bob@x.com");
    }
}
