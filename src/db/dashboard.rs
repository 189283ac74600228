use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_vehicles: i64,
    pub active_vehicles: i64,
    pub active_drivers: i64,
    pub upcoming_maintenance: i64,
    pub monthly_revenue: Decimal,
}

/// Headline counters for one organization. Revenue sums income since `month_start`.
pub async fn stats(
    pool: &PgPool,
    organization_id: Uuid,
    month_start: DateTime<Utc>,
) -> Result<DashboardStats, sqlx::Error> {
    sqlx::query_as::<_, DashboardStats>(
        "SELECT
            (SELECT COUNT(*) FROM vehicles WHERE organization_id = $1) AS total_vehicles,
            (SELECT COUNT(*) FROM vehicles
              WHERE organization_id = $1 AND status IN ('available', 'rented')) AS active_vehicles,
            (SELECT COUNT(*) FROM drivers
              WHERE organization_id = $1 AND status = 'active') AS active_drivers,
            (SELECT COUNT(*) FROM maintenance_records
              WHERE organization_id = $1 AND complete = false) AS upcoming_maintenance,
            (SELECT COALESCE(SUM(amount), 0) FROM transactions
              WHERE organization_id = $1 AND kind = 'income' AND date >= $2) AS monthly_revenue",
    )
    .bind(organization_id)
    .bind(month_start)
    .fetch_one(pool)
    .await
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStats {
    pub total_vehicles: i64,
    pub total_users: i64,
    pub total_drivers: i64,
    pub total_clients: i64,
}

/// Row counts for the super-admin organization view.
pub async fn organization_stats(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<OrganizationStats, sqlx::Error> {
    sqlx::query_as::<_, OrganizationStats>(
        "SELECT
            (SELECT COUNT(*) FROM vehicles WHERE organization_id = $1) AS total_vehicles,
            (SELECT COUNT(*) FROM users WHERE organization_id = $1) AS total_users,
            (SELECT COUNT(*) FROM drivers WHERE organization_id = $1) AS total_drivers,
            (SELECT COUNT(*) FROM clients WHERE organization_id = $1) AS total_clients",
    )
    .bind(organization_id)
    .fetch_one(pool)
    .await
}
