use axum::extract::State;
use axum::Json;

use crate::auth::extractor::CurrentUser;
use crate::db;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::middleware::audit;
use crate::models::{OrganizationSettings, SettingsChanges};
use crate::state::SharedState;

pub async fn get(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<OrganizationSettings>, AppError> {
    let settings = db::settings::find(&state.pool, auth.organization_id())
        .await?
        .unwrap_or_else(|| OrganizationSettings::defaults(auth.organization_id()));
    Ok(Json(settings))
}

pub async fn update(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<SettingsChanges>,
) -> Result<Json<OrganizationSettings>, AppError> {
    auth.require_org_admin()?;

    let settings = save(&state, auth.organization_id(), req).await?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "settings.updated",
        "organization_settings",
        settings.id,
        None,
    )
    .await;

    Ok(Json(settings))
}

/// Merges `changes` into the stored (or default) settings and persists them.
pub(crate) async fn save(
    state: &SharedState,
    organization_id: uuid::Uuid,
    changes: SettingsChanges,
) -> Result<OrganizationSettings, AppError> {
    let current = db::settings::find(&state.pool, organization_id)
        .await?
        .unwrap_or_else(|| OrganizationSettings::defaults(organization_id));
    let merged = current.apply(changes).map_err(AppError::BadRequest)?;
    Ok(db::settings::upsert(&state.pool, &merged).await?)
}
