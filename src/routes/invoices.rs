use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::db::{self, Owned};
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::audit;
use crate::models::{Invoice, InvoiceChanges, NewInvoice};
use crate::routes::{deleted, ensure_reference, require_found};
use crate::state::SharedState;

pub async fn list(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let invoices = db::invoices::list(&state.pool, auth.organization_id()).await?;
    Ok(Json(invoices))
}

pub async fn create(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<NewInvoice>,
) -> Result<Json<Invoice>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();
    ensure_reference(&state.pool, Owned::Client, Some(req.client_id), org).await?;

    let invoice = db::invoices::create(&state.pool, org, &req).await?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "invoice.created",
        "invoice",
        Some(invoice.id),
        Some(serde_json::json!({ "number": invoice.number })),
    )
    .await;

    Ok(Json(invoice))
}

pub async fn get(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = db::invoices::find_by_id(&state.pool, id, auth.organization_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;
    Ok(Json(invoice))
}

pub async fn update(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<InvoiceChanges>,
) -> Result<Json<Invoice>, AppError> {
    req.validate().map_err(AppError::BadRequest)?;
    let org = auth.organization_id();

    let current = db::invoices::find_by_id(&state.pool, id, org)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;
    let (total, paid) = req.merged_amounts(&current).map_err(AppError::BadRequest)?;
    ensure_reference(&state.pool, Owned::Client, req.client_id, org).await?;

    let invoice = db::invoices::update(&state.pool, id, org, &req, total, paid)
        .await
        .map_err(|e| AppError::not_found_on_missing(e, "Invoice not found"))?;

    audit::log_event(
        &state.pool,
        org,
        Some(auth.user_id()),
        "invoice.updated",
        "invoice",
        Some(invoice.id),
        Some(serde_json::json!({ "status": invoice.status })),
    )
    .await;

    Ok(Json(invoice))
}

pub async fn delete(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = db::invoices::delete(&state.pool, id, auth.organization_id()).await?;
    require_found(removed, "Invoice not found")?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "invoice.deleted",
        "invoice",
        Some(id),
        None,
    )
    .await;

    Ok(deleted())
}
