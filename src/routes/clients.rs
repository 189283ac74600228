use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::db;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::audit;
use crate::models::{Client, ClientChanges, Invoice, NewClient};
use crate::routes::{deleted, require_found};
use crate::state::SharedState;

pub async fn list(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = db::clients::list(&state.pool, auth.organization_id()).await?;
    Ok(Json(clients))
}

pub async fn create(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<NewClient>,
) -> Result<Json<Client>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;

    let client = db::clients::create(&state.pool, auth.organization_id(), &req).await?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "client.created",
        "client",
        Some(client.id),
        None,
    )
    .await;

    Ok(Json(client))
}

pub async fn get(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Client>, AppError> {
    let client = db::clients::find_by_id(&state.pool, id, auth.organization_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
    Ok(Json(client))
}

pub async fn update(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ClientChanges>,
) -> Result<Json<Client>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;

    let client = db::clients::update(&state.pool, id, auth.organization_id(), &req)
        .await
        .map_err(|e| AppError::not_found_on_missing(e, "Client not found"))?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "client.updated",
        "client",
        Some(client.id),
        None,
    )
    .await;

    Ok(Json(client))
}

pub async fn delete(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = db::clients::delete(&state.pool, id, auth.organization_id()).await?;
    require_found(removed, "Client not found")?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "client.deleted",
        "client",
        Some(id),
        None,
    )
    .await;

    Ok(deleted())
}

pub async fn invoices(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let invoices = db::invoices::list_by_client(&state.pool, id, auth.organization_id()).await?;
    Ok(Json(invoices))
}
