use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Driver, DriverChanges, DriverStatus, NewDriver};

pub async fn list(pool: &PgPool, organization_id: Uuid) -> Result<Vec<Driver>, sqlx::Error> {
    sqlx::query_as::<_, Driver>(
        "SELECT * FROM drivers WHERE organization_id = $1 ORDER BY created_at DESC",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    organization_id: Uuid,
    driver: &NewDriver,
) -> Result<Driver, sqlx::Error> {
    sqlx::query_as::<_, Driver>(
        "INSERT INTO drivers (organization_id, user_id, last_name, first_name, phone, email,
                              license_number, license_expires_at, assigned_vehicle_id, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(organization_id)
    .bind(driver.user_id)
    .bind(&driver.last_name)
    .bind(&driver.first_name)
    .bind(&driver.phone)
    .bind(&driver.email)
    .bind(&driver.license_number)
    .bind(driver.license_expires_at)
    .bind(driver.assigned_vehicle_id)
    .bind(driver.status.unwrap_or(DriverStatus::Active))
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
) -> Result<Option<Driver>, sqlx::Error> {
    sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
    changes: &DriverChanges,
) -> Result<Driver, sqlx::Error> {
    sqlx::query_as::<_, Driver>(
        "UPDATE drivers SET
            user_id = COALESCE($3, user_id),
            last_name = COALESCE($4, last_name),
            first_name = COALESCE($5, first_name),
            phone = COALESCE($6, phone),
            email = COALESCE($7, email),
            license_number = COALESCE($8, license_number),
            license_expires_at = COALESCE($9, license_expires_at),
            assigned_vehicle_id = COALESCE($10, assigned_vehicle_id),
            status = COALESCE($11, status)
         WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(organization_id)
    .bind(changes.user_id)
    .bind(&changes.last_name)
    .bind(&changes.first_name)
    .bind(&changes.phone)
    .bind(&changes.email)
    .bind(&changes.license_number)
    .bind(changes.license_expires_at)
    .bind(changes.assigned_vehicle_id)
    .bind(changes.status)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, organization_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM drivers WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
