use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{FuelRecord, FuelRecordChanges, NewFuelRecord};

pub async fn list(pool: &PgPool, organization_id: Uuid) -> Result<Vec<FuelRecord>, sqlx::Error> {
    sqlx::query_as::<_, FuelRecord>(
        "SELECT * FROM fuel_records WHERE organization_id = $1 ORDER BY date DESC",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_vehicle(
    pool: &PgPool,
    vehicle_id: Uuid,
    organization_id: Uuid,
) -> Result<Vec<FuelRecord>, sqlx::Error> {
    sqlx::query_as::<_, FuelRecord>(
        "SELECT * FROM fuel_records WHERE vehicle_id = $1 AND organization_id = $2 ORDER BY date DESC",
    )
    .bind(vehicle_id)
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    organization_id: Uuid,
    record: &NewFuelRecord,
    total_cost: Decimal,
) -> Result<FuelRecord, sqlx::Error> {
    sqlx::query_as::<_, FuelRecord>(
        "INSERT INTO fuel_records (organization_id, vehicle_id, driver_id, date, quantity,
                                   unit_cost, total_cost, mileage, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(organization_id)
    .bind(record.vehicle_id)
    .bind(record.driver_id)
    .bind(record.date.unwrap_or_else(Utc::now))
    .bind(record.quantity)
    .bind(record.unit_cost)
    .bind(total_cost)
    .bind(record.mileage)
    .bind(&record.notes)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
) -> Result<Option<FuelRecord>, sqlx::Error> {
    sqlx::query_as::<_, FuelRecord>(
        "SELECT * FROM fuel_records WHERE id = $1 AND organization_id = $2",
    )
    .bind(id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
    changes: &FuelRecordChanges,
    total_cost: Decimal,
) -> Result<FuelRecord, sqlx::Error> {
    sqlx::query_as::<_, FuelRecord>(
        "UPDATE fuel_records SET
            vehicle_id = COALESCE($3, vehicle_id),
            driver_id = COALESCE($4, driver_id),
            date = COALESCE($5, date),
            quantity = COALESCE($6, quantity),
            unit_cost = COALESCE($7, unit_cost),
            total_cost = $8,
            mileage = COALESCE($9, mileage),
            notes = COALESCE($10, notes)
         WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(organization_id)
    .bind(changes.vehicle_id)
    .bind(changes.driver_id)
    .bind(changes.date)
    .bind(changes.quantity)
    .bind(changes.unit_cost)
    .bind(total_cost)
    .bind(changes.mileage)
    .bind(&changes.notes)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, organization_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM fuel_records WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
