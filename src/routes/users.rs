use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::db;
use crate::db::users::NewUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::audit;
use crate::models::{normalize_email, Role, User};
use crate::routes::{deleted, require_found};
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

#[derive(Deserialize)]
pub struct UpdateRole {
    pub role: Role,
}

pub async fn list(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = db::users::list_by_organization(&state.pool, auth.organization_id()).await?;
    Ok(Json(users))
}

pub async fn create(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateUser>,
) -> Result<Json<User>, AppError> {
    auth.require_org_admin()?;
    let role = req.role.unwrap_or(Role::Gestionnaire);
    ensure_can_grant(&auth, role)?;

    let email = normalize_email(&req.email);
    if !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if req.last_name.trim().is_empty() || req.first_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "First and last name are required".to_string(),
        ));
    }

    let user = db::users::create(
        &state.pool,
        &NewUser {
            organization_id: auth.organization_id(),
            external_auth_id: None,
            last_name: req.last_name.trim(),
            first_name: req.first_name.trim(),
            email: &email,
            phone: req.phone.as_deref(),
            role,
        },
    )
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "A user with this email already exists"))?;

    if let Some(ref mailer) = state.system_mailer {
        if let Some(organization) =
            db::organizations::find_by_id(&state.pool, auth.organization_id()).await?
        {
            let name = format!("{} {}", user.first_name, user.last_name);
            if let Err(e) = mailer
                .send_member_added(&user.email, &name, &organization.name, &state.config.base_url)
                .await
            {
                tracing::warn!(user_id = %user.id, "Failed to send member email: {e}");
            }
        }
    }

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "user.created",
        "user",
        Some(user.id),
        Some(serde_json::json!({ "role": user.role })),
    )
    .await;

    Ok(Json(user))
}

pub async fn update_role(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateRole>,
) -> Result<Json<User>, AppError> {
    auth.require_org_admin()?;
    ensure_can_grant(&auth, req.role)?;
    let target = find_member(&state, &auth, id).await?;
    ensure_can_manage(&auth, &target)?;

    let user = db::users::update_role(&state.pool, id, auth.organization_id(), req.role)
        .await
        .map_err(|e| AppError::not_found_on_missing(e, "User not found"))?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "user.role_changed",
        "user",
        Some(user.id),
        Some(serde_json::json!({ "role": user.role })),
    )
    .await;

    Ok(Json(user))
}

pub async fn delete(
    auth: CurrentUser,
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_org_admin()?;
    if id == auth.user_id() {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }
    let target = find_member(&state, &auth, id).await?;
    ensure_can_manage(&auth, &target)?;

    let removed = db::users::delete(&state.pool, id, auth.organization_id()).await?;
    require_found(removed, "User not found")?;

    audit::log_event(
        &state.pool,
        auth.organization_id(),
        Some(auth.user_id()),
        "user.deleted",
        "user",
        Some(id),
        None,
    )
    .await;

    Ok(deleted())
}

fn ensure_can_grant(auth: &CurrentUser, role: Role) -> Result<(), AppError> {
    if role == Role::SuperAdmin && auth.role() != Role::SuperAdmin {
        return Err(AppError::Forbidden(
            "Only a super admin can grant the super_admin role".to_string(),
        ));
    }
    Ok(())
}

/// A `super_admin` account is only managed by another super admin.
fn ensure_can_manage(auth: &CurrentUser, target: &User) -> Result<(), AppError> {
    if target.role == Role::SuperAdmin && auth.role() != Role::SuperAdmin {
        return Err(AppError::Forbidden(
            "Only a super admin can modify a super admin".to_string(),
        ));
    }
    Ok(())
}

async fn find_member(state: &SharedState, auth: &CurrentUser, id: Uuid) -> Result<User, AppError> {
    db::users::find_by_id(&state.pool, id, auth.organization_id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
