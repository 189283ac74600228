use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::db::{self, Owned};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::audit;
use crate::models::{FuelRecord, FuelRecordChanges, NewFuelRecord};
use crate::routes::{deleted, ensure_reference, require_found};
use crate::state::SharedState;

pub async fn list(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<FuelRecord>>, AppError> {
    let records = db::fuel_records::list(&state.pool, auth.organization_id()).await?;
    Ok(Json(records))
}

pub async fn create(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<NewFuelRecord>,
) -> Result<Json<FuelRecord>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();
    ensure_reference(&state.pool, Owned::Vehicle, Some(req.vehicle_id), org).await?;
    ensure_reference(&state.pool, Owned::Driver, req.driver_id, org).await?;
    let total_cost = req.total_cost().map_err(AppError::BadRequest)?;

    let record = db::fuel_records::create(&state.pool, org, &req, total_cost).await?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "fuel_record.created",
        "fuel_record",
        Some(record.id),
        None,
    )
    .await;

    Ok(Json(record))
}

pub async fn get(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<FuelRecord>, AppError> {
    let record = db::fuel_records::find_by_id(&state.pool, id, auth.organization_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Fuel record not found".to_string()))?;
    Ok(Json(record))
}

pub async fn update(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<FuelRecordChanges>,
) -> Result<Json<FuelRecord>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();
    ensure_reference(&state.pool, Owned::Vehicle, req.vehicle_id, org).await?;
    ensure_reference(&state.pool, Owned::Driver, req.driver_id, org).await?;

    let current = db::fuel_records::find_by_id(&state.pool, id, org)
        .await?
        .ok_or_else(|| AppError::NotFound("Fuel record not found".to_string()))?;
    let total_cost = req.merged_total(&current).map_err(AppError::BadRequest)?;

    let record = db::fuel_records::update(&state.pool, id, org, &req, total_cost)
        .await
        .map_err(|e| AppError::not_found_on_missing(e, "Fuel record not found"))?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "fuel_record.updated",
        "fuel_record",
        Some(record.id),
        None,
    )
    .await;

    Ok(Json(record))
}

pub async fn delete(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = db::fuel_records::delete(&state.pool, id, auth.organization_id()).await?;
    require_found(removed, "Fuel record not found")?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "fuel_record.deleted",
        "fuel_record",
        Some(id),
        None,
    )
    .await;

    Ok(deleted())
}
