use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{MaintenanceChanges, MaintenanceRecord, MaintenanceUrgency, NewMaintenanceRecord};

pub async fn list(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<Vec<MaintenanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceRecord>(
        "SELECT * FROM maintenance_records WHERE organization_id = $1 ORDER BY created_at DESC",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_vehicle(
    pool: &PgPool,
    vehicle_id: Uuid,
    organization_id: Uuid,
) -> Result<Vec<MaintenanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceRecord>(
        "SELECT * FROM maintenance_records
         WHERE vehicle_id = $1 AND organization_id = $2 ORDER BY created_at DESC",
    )
    .bind(vehicle_id)
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

/// Incomplete records, soonest planned first.
pub async fn list_upcoming(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<Vec<MaintenanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceRecord>(
        "SELECT * FROM maintenance_records
         WHERE organization_id = $1 AND complete = false
         ORDER BY planned_at ASC NULLS LAST",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    organization_id: Uuid,
    record: &NewMaintenanceRecord,
) -> Result<MaintenanceRecord, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceRecord>(
        "INSERT INTO maintenance_records (organization_id, vehicle_id, kind, description, planned_at,
                                          done_at, planned_mileage, done_mileage, cost, urgency,
                                          complete, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
    )
    .bind(organization_id)
    .bind(record.vehicle_id)
    .bind(&record.kind)
    .bind(&record.description)
    .bind(record.planned_at)
    .bind(record.done_at)
    .bind(record.planned_mileage)
    .bind(record.done_mileage)
    .bind(record.cost)
    .bind(record.urgency.unwrap_or(MaintenanceUrgency::Scheduled))
    .bind(record.complete.unwrap_or(false))
    .bind(&record.notes)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
) -> Result<Option<MaintenanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceRecord>(
        "SELECT * FROM maintenance_records WHERE id = $1 AND organization_id = $2",
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
    changes: &MaintenanceChanges,
) -> Result<MaintenanceRecord, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceRecord>(
        "UPDATE maintenance_records SET
            vehicle_id = COALESCE($3, vehicle_id),
            kind = COALESCE($4, kind),
            description = COALESCE($5, description),
            planned_at = COALESCE($6, planned_at),
            done_at = COALESCE($7, done_at),
            planned_mileage = COALESCE($8, planned_mileage),
            done_mileage = COALESCE($9, done_mileage),
            cost = COALESCE($10, cost),
            urgency = COALESCE($11, urgency),
            complete = COALESCE($12, complete),
            notes = COALESCE($13, notes)
         WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(organization_id)
    .bind(changes.vehicle_id)
    .bind(&changes.kind)
    .bind(&changes.description)
    .bind(changes.planned_at)
    .bind(changes.done_at)
    .bind(changes.planned_mileage)
    .bind(changes.done_mileage)
    .bind(changes.cost)
    .bind(changes.urgency)
    .bind(changes.complete)
    .bind(&changes.notes)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, organization_id: Uuid) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM maintenance_records WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}
