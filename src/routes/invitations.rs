use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::extractor::Identity;
use crate::auth::token;
use crate::db;
use crate::db::users::NewUser;
use crate::error::AppError;
use crate::extract::ApiPath;
use crate::middleware::audit;
use crate::models::{normalize_email, Invitation, InvitationState, Role, User};
use crate::state::SharedState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDetails {
    pub id: Uuid,
    pub email: String,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    pub status: InvitationState,
    pub is_expired: bool,
    pub is_used: bool,
    pub invited_by: Option<String>,
}

#[derive(Serialize)]
pub struct AcceptResponse {
    pub message: String,
    pub user: User,
}

/// Public view of an invitation. Never mutates it.
pub async fn inspect(
    State(state): State<SharedState>,
    ApiPath(raw_token): ApiPath<String>,
) -> Result<Json<InvitationDetails>, AppError> {
    let invitation = db::invitations::find_by_token_hash(&state.pool, &token::hash(&raw_token))
        .await?
        .ok_or_else(invitation_not_found)?;

    let organization = db::organizations::find_by_id(&state.pool, invitation.organization_id)
        .await?
        .ok_or_else(invitation_not_found)?;

    let invited_by = match invitation.created_by {
        Some(user_id) => db::users::find_by_id_global(&state.pool, user_id)
            .await?
            .map(|u| format!("{} {}", u.first_name, u.last_name).trim().to_string()),
        None => None,
    };

    let now = Utc::now();
    Ok(Json(InvitationDetails {
        id: invitation.id,
        status: invitation.state(now),
        is_expired: invitation.is_expired(now),
        is_used: invitation.is_used(),
        email: invitation.email,
        organization_id: organization.id,
        organization_name: organization.name,
        role: invitation.role,
        expires_at: invitation.expires_at,
        invited_by,
    }))
}

/// Consumes the invitation and makes the caller a member of its organization.
pub async fn accept(
    identity: Identity,
    State(state): State<SharedState>,
    ApiPath(raw_token): ApiPath<String>,
) -> Result<Json<AcceptResponse>, AppError> {
    let now = Utc::now();
    let mut tx = state.pool.begin().await?;

    let invitation = db::invitations::find_by_token_hash(&mut *tx, &token::hash(&raw_token))
        .await?
        .ok_or_else(invitation_not_found)?;
    check_acceptable(&invitation, identity.email(), now)?;

    let invitation = db::invitations::mark_used(&mut *tx, invitation.id, now)
        .await?
        .ok_or_else(|| AppError::Conflict("Invitation has already been used".to_string()))?;

    let email = normalize_email(identity.email());
    let user = match db::users::find_by_external_id(&mut *tx, identity.subject()).await? {
        Some(user) => {
            let role = membership_role(&user, invitation.role);
            db::users::assign_membership(&mut *tx, user.id, invitation.organization_id, role)
                .await?
        }
        None => match db::users::find_by_email(&mut *tx, &email).await? {
            Some(user) if user.external_auth_id.is_none() => {
                db::users::link_external_id(&mut *tx, user.id, identity.subject())
                    .await?
                    .ok_or_else(|| {
                        AppError::Conflict("Email is already bound to another identity".to_string())
                    })?;
                db::users::assign_membership(
                    &mut *tx,
                    user.id,
                    invitation.organization_id,
                    membership_role(&user, invitation.role),
                )
                .await?
            }
            Some(_) => {
                return Err(AppError::Conflict(
                    "Email is already bound to another identity".to_string(),
                ));
            }
            None => {
                let claims = &identity.0;
                db::users::create(
                    &mut *tx,
                    &NewUser {
                        organization_id: invitation.organization_id,
                        external_auth_id: Some(identity.subject()),
                        last_name: claims.last_name.trim(),
                        first_name: claims.first_name.trim(),
                        email: &email,
                        phone: None,
                        role: invitation.role,
                    },
                )
                .await
                .map_err(|e| AppError::conflict_on_unique(e, "Email is already in use"))?
            }
        },
    };

    tx.commit().await?;

    tracing::info!(
        invitation_id = %invitation.id,
        user_id = %user.id,
        organization_id = %user.organization_id,
        "Invitation accepted"
    );

    audit::log_event(
        &state.pool,
        invitation.organization_id,
        Some(user.id),
        "invitation.accepted",
        "invitation",
        Some(invitation.id),
        Some(serde_json::json!({ "role": user.role })),
    )
    .await;

    Ok(Json(AcceptResponse {
        message: "Invitation accepted".to_string(),
        user,
    }))
}

/// Used and expired take precedence over an email mismatch.
fn check_acceptable(invitation: &Invitation, email: &str, now: DateTime<Utc>) -> Result<(), AppError> {
    if invitation.is_used() {
        return Err(AppError::Conflict(
            "Invitation has already been used".to_string(),
        ));
    }
    if invitation.is_expired(now) {
        return Err(AppError::Conflict("Invitation has expired".to_string()));
    }
    if normalize_email(email) != normalize_email(&invitation.email) {
        return Err(AppError::Forbidden(
            "This invitation was sent to a different email address".to_string(),
        ));
    }
    Ok(())
}

/// Role after joining through an invitation. A super admin keeps their role.
fn membership_role(user: &User, invited: Role) -> Role {
    if user.role == Role::SuperAdmin {
        Role::SuperAdmin
    } else {
        invited
    }
}

fn invitation_not_found() -> AppError {
    AppError::NotFound("Invitation not found".to_string())
}
