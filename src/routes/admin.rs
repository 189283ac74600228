use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::auth::token;
use crate::db;
use crate::db::dashboard::OrganizationStats;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::audit;
use crate::models::{
    normalize_email, Invitation, Organization, OrganizationChanges, OrganizationSettings, Role,
    SettingsChanges,
};
use crate::routes::settings;
use crate::state::SharedState;

/// Subscriptions ending within this many days are reported as expiring soon.
const EXPIRING_SOON_DAYS: i64 = 30;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureToggle {
    pub enabled_features: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionAlerts {
    pub expired: Vec<Organization>,
    pub expiring_soon: Vec<Organization>,
}

#[derive(Deserialize)]
pub struct CreateInvitation {
    pub email: String,
    pub role: Option<Role>,
}

#[derive(Serialize)]
pub struct InvitationCreated {
    pub invitation: Invitation,
    pub token: String,
    pub url: String,
}

pub async fn list_organizations(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Organization>>, AppError> {
    auth.require_super_admin()?;
    let organizations = db::organizations::list(&state.pool).await?;
    Ok(Json(organizations))
}

pub async fn update_organization(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<OrganizationChanges>,
) -> Result<Json<Organization>, AppError> {
    auth.require_super_admin()?;

    let current = find_organization(&state, id).await?;
    req.validate(&current).map_err(AppError::BadRequest)?;

    let organization = db::organizations::update(&state.pool, id, &req)
        .await
        .map_err(|e| AppError::not_found_on_missing(e, "Organization not found"))?;

    audit::log_event(
        &state.pool,
        organization.id,
        Some(auth.user_id()),
        "organization.updated",
        "organization",
        Some(organization.id),
        Some(serde_json::json!({ "subscriptionStatus": organization.subscription_status })),
    )
    .await;

    Ok(Json(organization))
}

pub async fn organization_stats(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<OrganizationStats>, AppError> {
    auth.require_super_admin()?;
    find_organization(&state, id).await?;
    let stats = db::dashboard::organization_stats(&state.pool, id).await?;
    Ok(Json(stats))
}

pub async fn get_organization_settings(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<OrganizationSettings>, AppError> {
    auth.require_super_admin()?;
    find_organization(&state, id).await?;
    let settings = db::settings::find(&state.pool, id)
        .await?
        .unwrap_or_else(|| OrganizationSettings::defaults(id));
    Ok(Json(settings))
}

pub async fn update_organization_settings(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<FeatureToggle>,
) -> Result<Json<OrganizationSettings>, AppError> {
    auth.require_super_admin()?;
    find_organization(&state, id).await?;

    let changes = SettingsChanges {
        enabled_features: Some(req.enabled_features),
        ..Default::default()
    };
    let saved = settings::save(&state, id, changes).await?;

    audit::log_event(
        &state.pool,
        id,
        Some(auth.user_id()),
        "organization.features_updated",
        "organization_settings",
        saved.id,
        Some(serde_json::json!({ "enabledFeatures": saved.enabled_features })),
    )
    .await;

    Ok(Json(saved))
}

pub async fn subscription_alerts(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<SubscriptionAlerts>, AppError> {
    auth.require_super_admin()?;

    let now = Utc::now();
    let expired = db::organizations::list_expired(&state.pool, now).await?;
    let expiring_soon = db::organizations::list_expiring_between(
        &state.pool,
        now,
        now + Duration::days(EXPIRING_SOON_DAYS),
    )
    .await?;

    Ok(Json(SubscriptionAlerts {
        expired,
        expiring_soon,
    }))
}

pub async fn invite(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateInvitation>,
) -> Result<Json<InvitationCreated>, AppError> {
    auth.require_super_admin()?;

    let email = normalize_email(&req.email);
    if !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    let organization = find_organization(&state, id).await?;
    let role = req.role.unwrap_or(Role::AdminEntreprise);

    let token = token::generate();
    let expires_at = Invitation::expiry_from(Utc::now());
    let invitation = db::invitations::create(
        &state.pool,
        organization.id,
        &email,
        &token::hash(&token),
        role,
        expires_at,
        auth.user_id(),
    )
    .await?;
    let url = state.config.invitation_url(&token);

    if let Some(ref mailer) = state.system_mailer {
        let expires = expires_at.format("%Y-%m-%d %H:%M UTC").to_string();
        if let Err(e) = mailer
            .send_invitation(&email, &organization.name, role.as_str(), &url, &expires)
            .await
        {
            tracing::warn!(invitation_id = %invitation.id, "Failed to send invitation email: {e}");
        }
    }

    tracing::info!(
        invitation_id = %invitation.id,
        organization_id = %organization.id,
        %role,
        "Invitation created"
    );

    audit::log_event(
        &state.pool,
        organization.id,
        Some(auth.user_id()),
        "invitation.created",
        "invitation",
        Some(invitation.id),
        Some(serde_json::json!({ "email": email, "role": role })),
    )
    .await;

    Ok(Json(InvitationCreated {
        invitation,
        token,
        url,
    }))
}

async fn find_organization(state: &SharedState, id: Uuid) -> Result<Organization, AppError> {
    db::organizations::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))
}
