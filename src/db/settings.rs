use sqlx::PgPool;
use uuid::Uuid;

use crate::models::OrganizationSettings;

pub async fn find(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<Option<OrganizationSettings>, sqlx::Error> {
    sqlx::query_as::<_, OrganizationSettings>(
        "SELECT * FROM organization_settings WHERE organization_id = $1",
    )
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

/// Writes the full settings row, creating it on first save.
pub async fn upsert(
    pool: &PgPool,
    settings: &OrganizationSettings,
) -> Result<OrganizationSettings, sqlx::Error> {
    sqlx::query_as::<_, OrganizationSettings>(
        "INSERT INTO organization_settings (organization_id, trade_register, nis, nif, tax_article,
                                            legal_name, full_address, city, postal_code, country,
                                            phone, email, website, logo, primary_color,
                                            secondary_color, enabled_features)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
         ON CONFLICT (organization_id) DO UPDATE SET
            trade_register = EXCLUDED.trade_register,
            nis = EXCLUDED.nis,
            nif = EXCLUDED.nif,
            tax_article = EXCLUDED.tax_article,
            legal_name = EXCLUDED.legal_name,
            full_address = EXCLUDED.full_address,
            city = EXCLUDED.city,
            postal_code = EXCLUDED.postal_code,
            country = EXCLUDED.country,
            phone = EXCLUDED.phone,
            email = EXCLUDED.email,
            website = EXCLUDED.website,
            logo = EXCLUDED.logo,
            primary_color = EXCLUDED.primary_color,
            secondary_color = EXCLUDED.secondary_color,
            enabled_features = EXCLUDED.enabled_features,
            updated_at = now()
         RETURNING *",
    )
    .bind(settings.organization_id)
    .bind(&settings.trade_register)
    .bind(&settings.nis)
    .bind(&settings.nif)
    .bind(&settings.tax_article)
    .bind(&settings.legal_name)
    .bind(&settings.full_address)
    .bind(&settings.city)
    .bind(&settings.postal_code)
    .bind(&settings.country)
    .bind(&settings.phone)
    .bind(&settings.email)
    .bind(&settings.website)
    .bind(&settings.logo)
    .bind(&settings.primary_color)
    .bind(&settings.secondary_color)
    .bind(&settings.enabled_features)
    .fetch_one(pool)
    .await
}
