use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewVehicle, Vehicle, VehicleChanges, VehicleStatus};

pub async fn list(pool: &PgPool, organization_id: Uuid) -> Result<Vec<Vehicle>, sqlx::Error> {
    sqlx::query_as::<_, Vehicle>(
        "SELECT * FROM vehicles WHERE organization_id = $1 ORDER BY created_at DESC",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    organization_id: Uuid,
    vehicle: &NewVehicle,
) -> Result<Vehicle, sqlx::Error> {
    sqlx::query_as::<_, Vehicle>(
        "INSERT INTO vehicles (organization_id, license_plate, make, model, kind, year, mileage, work_hours, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(organization_id)
    .bind(&vehicle.license_plate)
    .bind(&vehicle.make)
    .bind(&vehicle.model)
    .bind(&vehicle.kind)
    .bind(vehicle.year)
    .bind(vehicle.mileage.unwrap_or(0))
    .bind(vehicle.work_hours.unwrap_or(0))
    .bind(vehicle.status.unwrap_or(VehicleStatus::Available))
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
) -> Result<Option<Vehicle>, sqlx::Error> {
    sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
    changes: &VehicleChanges,
) -> Result<Vehicle, sqlx::Error> {
    sqlx::query_as::<_, Vehicle>(
        "UPDATE vehicles SET
            license_plate = COALESCE($3, license_plate),
            make = COALESCE($4, make),
            model = COALESCE($5, model),
            kind = COALESCE($6, kind),
            year = COALESCE($7, year),
            mileage = COALESCE($8, mileage),
            work_hours = COALESCE($9, work_hours),
            status = COALESCE($10, status)
         WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(organization_id)
    .bind(&changes.license_plate)
    .bind(&changes.make)
    .bind(&changes.model)
    .bind(&changes.kind)
    .bind(changes.year)
    .bind(changes.mileage)
    .bind(changes.work_hours)
    .bind(changes.status)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, organization_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
