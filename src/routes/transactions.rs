use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::db::{self, Owned};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::audit;
use crate::models::{NewTransaction, Transaction, TransactionChanges};
use crate::routes::{deleted, ensure_reference, require_found};
use crate::state::SharedState;

pub async fn list(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = db::transactions::list(&state.pool, auth.organization_id()).await?;
    Ok(Json(transactions))
}

pub async fn create(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<NewTransaction>,
) -> Result<Json<Transaction>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();
    ensure_reference(&state.pool, Owned::Vehicle, req.vehicle_id, org).await?;
    ensure_reference(&state.pool, Owned::Client, req.client_id, org).await?;

    let transaction = db::transactions::create(&state.pool, org, &req).await?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "transaction.created",
        "transaction",
        Some(transaction.id),
        Some(serde_json::json!({ "kind": transaction.kind, "amount": transaction.amount })),
    )
    .await;

    Ok(Json(transaction))
}

pub async fn get(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = db::transactions::find_by_id(&state.pool, id, auth.organization_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;
    Ok(Json(transaction))
}

pub async fn update(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<TransactionChanges>,
) -> Result<Json<Transaction>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();
    ensure_reference(&state.pool, Owned::Vehicle, req.vehicle_id, org).await?;
    ensure_reference(&state.pool, Owned::Client, req.client_id, org).await?;

    let transaction = db::transactions::update(&state.pool, id, org, &req)
        .await
        .map_err(|e| AppError::not_found_on_missing(e, "Transaction not found"))?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "transaction.updated",
        "transaction",
        Some(transaction.id),
        None,
    )
    .await;

    Ok(Json(transaction))
}

pub async fn delete(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = db::transactions::delete(&state.pool, id, auth.organization_id()).await?;
    require_found(removed, "Transaction not found")?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "transaction.deleted",
        "transaction",
        Some(id),
        None,
    )
    .await;

    Ok(deleted())
}
