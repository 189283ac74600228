use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::db::{self, Owned};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::audit;
use crate::models::{Driver, DriverChanges, NewDriver};
use crate::routes::{deleted, ensure_reference, require_found};
use crate::state::SharedState;

pub async fn list(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Driver>>, AppError> {
    let drivers = db::drivers::list(&state.pool, auth.organization_id()).await?;
    Ok(Json(drivers))
}

pub async fn create(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<NewDriver>,
) -> Result<Json<Driver>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();
    ensure_reference(&state.pool, Owned::User, req.user_id, org).await?;
    ensure_reference(&state.pool, Owned::Vehicle, req.assigned_vehicle_id, org).await?;

    let driver = db::drivers::create(&state.pool, org, &req).await?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "driver.created",
        "driver",
        Some(driver.id),
        None,
    )
    .await;

    Ok(Json(driver))
}

pub async fn get(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Driver>, AppError> {
    let driver = db::drivers::find_by_id(&state.pool, id, auth.organization_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;
    Ok(Json(driver))
}

pub async fn update(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<DriverChanges>,
) -> Result<Json<Driver>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();
    ensure_reference(&state.pool, Owned::User, req.user_id, org).await?;
    ensure_reference(&state.pool, Owned::Vehicle, req.assigned_vehicle_id, org).await?;

    let driver = db::drivers::update(&state.pool, id, org, &req)
        .await
        .map_err(|e| AppError::not_found_on_missing(e, "Driver not found"))?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "driver.updated",
        "driver",
        Some(driver.id),
        None,
    )
    .await;

    Ok(Json(driver))
}

pub async fn delete(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = db::drivers::delete(&state.pool, id, auth.organization_id()).await?;
    require_found(removed, "Driver not found")?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "driver.deleted",
        "driver",
        Some(id),
        None,
    )
    .await;

    Ok(deleted())
}
