use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::db::{self, Owned};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::audit;
use crate::models::{MaintenanceChanges, MaintenanceRecord, NewMaintenanceRecord};
use crate::routes::{deleted, ensure_reference, require_found};
use crate::state::SharedState;

pub async fn list(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<MaintenanceRecord>>, AppError> {
    let records = db::maintenance::list(&state.pool, auth.organization_id()).await?;
    Ok(Json(records))
}

pub async fn upcoming(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<MaintenanceRecord>>, AppError> {
    let records = db::maintenance::list_upcoming(&state.pool, auth.organization_id()).await?;
    Ok(Json(records))
}

pub async fn create(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<NewMaintenanceRecord>,
) -> Result<Json<MaintenanceRecord>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();
    ensure_reference(&state.pool, Owned::Vehicle, Some(req.vehicle_id), org).await?;

    let record = db::maintenance::create(&state.pool, org, &req).await?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "maintenance.created",
        "maintenance_record",
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
) -> Result<Json<MaintenanceRecord>, AppError> {
    let record = db::maintenance::find_by_id(&state.pool, id, auth.organization_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance record not found".to_string()))?;
    Ok(Json(record))
}

pub async fn update(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<MaintenanceChanges>,
) -> Result<Json<MaintenanceRecord>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();
    ensure_reference(&state.pool, Owned::Vehicle, req.vehicle_id, org).await?;

    let record = db::maintenance::update(&state.pool, id, org, &req)
        .await
        .map_err(|e| AppError::not_found_on_missing(e, "Maintenance record not found"))?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "maintenance.updated",
        "maintenance_record",
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
    let removed = db::maintenance::delete(&state.pool, id, auth.organization_id()).await?;
    require_found(removed, "Maintenance record not found")?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "maintenance.deleted",
        "maintenance_record",
        Some(id),
        None,
    )
    .await;

    Ok(deleted())
}
