use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::auth::extractor::{CurrentUser, Identity};
use crate::auth::provisioning::{self, Outcome};
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::User;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct LoginResponse {
    pub outcome: Outcome,
    pub user: User,
}

/// Profile of the signed-in user.
pub async fn current_user(auth: CurrentUser) -> Json<User> {
    Json(auth.user)
}

/// Resolves the caller's identity to a user, provisioning one on first login.
pub async fn login(
    identity: Identity,
    State(state): State<SharedState>,
) -> Result<Json<LoginResponse>, AppError> {
    let (outcome, user) = provisioning::provision(&state.pool, &identity.0).await?;

    let action = match outcome {
        Outcome::Existing => None,
        Outcome::Linked => Some("user.linked"),
        Outcome::Created => Some("organization.provisioned"),
    };
    if let Some(action) = action {
        audit::log_event(
            &state.pool,
            user.organization_id,
            Some(user.id),
            action,
            "user",
            Some(user.id),
            None,
        )
        .await;
    }

    Ok(Json(LoginResponse { outcome, user }))
}
