use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Features an organization can toggle, in display order.
pub const FEATURES: [&str; 7] = [
    "vehicles",
    "drivers",
    "clients",
    "fuel",
    "maintenance",
    "treasury",
    "invoices",
];

pub const DEFAULT_COUNTRY: &str = "Algérie";
pub const DEFAULT_PRIMARY_COLOR: &str = "#2563eb";
pub const DEFAULT_SECONDARY_COLOR: &str = "#64748b";

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSettings {
    pub id: Option<Uuid>,
    pub organization_id: Uuid,
    pub trade_register: Option<String>,
    pub nis: Option<String>,
    pub nif: Option<String>,
    pub tax_article: Option<String>,
    pub legal_name: Option<String>,
    pub full_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub enabled_features: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrganizationSettings {
    /// Settings reported for an organization that never saved any.
    pub fn defaults(organization_id: Uuid) -> Self {
        Self {
            id: None,
            organization_id,
            trade_register: None,
            nis: None,
            nif: None,
            tax_article: None,
            legal_name: None,
            full_address: None,
            city: None,
            postal_code: None,
            country: DEFAULT_COUNTRY.to_string(),
            phone: None,
            email: None,
            website: None,
            logo: None,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            enabled_features: FEATURES.iter().map(|f| f.to_string()).collect(),
            updated_at: None,
        }
    }
}

/// Payload of a settings upsert. `None` keeps the stored (or default) value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChanges {
    pub trade_register: Option<String>,
    pub nis: Option<String>,
    pub nif: Option<String>,
    pub tax_article: Option<String>,
    pub legal_name: Option<String>,
    pub full_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub enabled_features: Option<Vec<String>>,
}

impl OrganizationSettings {
    /// Applies validated changes on top of `self`.
    pub fn apply(mut self, changes: SettingsChanges) -> Result<Self, String> {
        for color in [&changes.primary_color, &changes.secondary_color]
            .into_iter()
            .flatten()
        {
            if !is_hex_color(color) {
                return Err(format!("Invalid color: {color}"));
            }
        }
        if let Some(features) = &changes.enabled_features {
            self.enabled_features = normalize_features(features)?;
        }

        macro_rules! merge {
            ($($field:ident),*) => {
                $(if changes.$field.is_some() { self.$field = changes.$field; })*
            };
        }
        merge!(
            trade_register, nis, nif, tax_article, legal_name, full_address, city,
            postal_code, phone, email, website, logo
        );
        if let Some(country) = changes.country {
            self.country = country;
        }
        if let Some(color) = changes.primary_color {
            self.primary_color = color;
        }
        if let Some(color) = changes.secondary_color {
            self.secondary_color = color;
        }
        Ok(self)
    }
}

/// Validates a requested feature list against [`FEATURES`], dropping
/// duplicates and returning it in allow-list order.
pub fn normalize_features(requested: &[String]) -> Result<Vec<String>, String> {
    if let Some(unknown) = requested
        .iter()
        .find(|f| !FEATURES.contains(&f.as_str()))
    {
        return Err(format!("Unknown feature: {unknown}"));
    }

    Ok(FEATURES
        .iter()
        .filter(|f| requested.iter().any(|r| r == *f))
        .map(|f| f.to_string())
        .collect())
}

/// `#rrggbb` hex color.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
