use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Organization, OrganizationChanges};

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    name: &str,
    email: &str,
) -> Result<Organization, sqlx::Error> {
    sqlx::query_as::<_, Organization>(
        "INSERT INTO organizations (name, email) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(email)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Organization>, sqlx::Error> {
    sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Organization>, sqlx::Error> {
    sqlx::query_as::<_, Organization>("SELECT * FROM organizations ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &OrganizationChanges,
) -> Result<Organization, sqlx::Error> {
    sqlx::query_as::<_, Organization>(
        "UPDATE organizations SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            address = COALESCE($5, address),
            manager_last_name = COALESCE($6, manager_last_name),
            manager_first_name = COALESCE($7, manager_first_name),
            manager_email = COALESCE($8, manager_email),
            manager_phone = COALESCE($9, manager_phone),
            subscription_start = COALESCE($10, subscription_start),
            subscription_end = COALESCE($11, subscription_end),
            subscription_status = COALESCE($12, subscription_status),
            last_reminder_at = COALESCE($13, last_reminder_at)
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.email)
    .bind(&changes.phone)
    .bind(&changes.address)
    .bind(&changes.manager_last_name)
    .bind(&changes.manager_first_name)
    .bind(&changes.manager_email)
    .bind(&changes.manager_phone)
    .bind(changes.subscription_start)
    .bind(changes.subscription_end)
    .bind(changes.subscription_status)
    .bind(changes.last_reminder_at)
    .fetch_one(pool)
    .await
}

/// Organizations whose subscription ended before `now`.
pub async fn list_expired(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<Vec<Organization>, sqlx::Error> {
    sqlx::query_as::<_, Organization>(
        "SELECT * FROM organizations
         WHERE subscription_end IS NOT NULL AND subscription_end < $1
         ORDER BY subscription_end",
    )
    .bind(now)
    .fetch_all(pool)
    .await
}

/// Organizations whose subscription ends in `(now, until]`.
pub async fn list_expiring_between(
    pool: &PgPool,
    now: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<Organization>, sqlx::Error> {
    sqlx::query_as::<_, Organization>(
        "SELECT * FROM organizations
         WHERE subscription_end > $1 AND subscription_end <= $2
         ORDER BY subscription_end",
    )
    .bind(now)
    .bind(until)
    .fetch_all(pool)
    .await
}
