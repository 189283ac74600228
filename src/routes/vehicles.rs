use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::db;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::audit;
use crate::models::{FuelRecord, MaintenanceRecord, NewVehicle, Vehicle, VehicleChanges};
use crate::routes::{deleted, require_found};
use crate::state::SharedState;

pub async fn list(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = db::vehicles::list(&state.pool, auth.organization_id()).await?;
    Ok(Json(vehicles))
}

pub async fn create(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<NewVehicle>,
) -> Result<Json<Vehicle>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;

    let vehicle = db::vehicles::create(&state.pool, auth.organization_id(), &req).await?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "vehicle.created",
        "vehicle",
        Some(vehicle.id),
        None,
    )
    .await;

    Ok(Json(vehicle))
}

pub async fn get(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    let vehicle = db::vehicles::find_by_id(&state.pool, id, auth.organization_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;
    Ok(Json(vehicle))
}

pub async fn update(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<VehicleChanges>,
) -> Result<Json<Vehicle>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;

    let vehicle = db::vehicles::update(&state.pool, id, auth.organization_id(), &req)
        .await
        .map_err(|e| AppError::not_found_on_missing(e, "Vehicle not found"))?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "vehicle.updated",
        "vehicle",
        Some(vehicle.id),
        None,
    )
    .await;

    Ok(Json(vehicle))
}

pub async fn delete(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = db::vehicles::delete(&state.pool, id, auth.organization_id()).await?;
    require_found(removed, "Vehicle not found")?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "vehicle.deleted",
        "vehicle",
        Some(id),
        None,
    )
    .await;

    Ok(deleted())
}

pub async fn fuel(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<FuelRecord>>, AppError> {
    let records = db::fuel_records::list_by_vehicle(&state.pool, id, auth.organization_id()).await?;
    Ok(Json(records))
}

pub async fn maintenance(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<MaintenanceRecord>>, AppError> {
    let records = db::maintenance::list_by_vehicle(&state.pool, id, auth.organization_id()).await?;
    Ok(Json(records))
}
