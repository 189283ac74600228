use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::client_ip::client_ip;
use crate::db;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::middleware::audit;
use crate::models::{normalize_email, Role, User};
use crate::rate_limit::{self, PROMOTION_WINDOW_SECS};
use crate::state::SharedState;

const INVALID_CREDENTIALS: &str = "Invalid email or security code";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteRequest {
    pub email: String,
    pub security_code: String,
}

#[derive(Serialize)]
pub struct PromoteResponse {
    pub message: String,
    pub user: User,
}

/// Elevates a user to `super_admin` given the shared setup code.
pub async fn promote(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<PromoteRequest>,
) -> Result<Json<PromoteResponse>, AppError> {
    let Some(setup_code) = state.config.admin_setup_code.as_deref() else {
        tracing::warn!("Promotion attempted while ADMIN_SETUP_CODE is unset");
        return Err(AppError::Forbidden("Admin promotion is disabled".to_string()));
    };

    let addr = client_ip(&headers, peer.ip(), &state.config.trusted_proxies).to_string();
    let now = Utc::now();

    let attempt =
        db::promotion_attempts::reserve(&state.pool, &addr, now, PROMOTION_WINDOW_SECS).await?;
    if let Err(retry_after) = rate_limit::check_promotion(&attempt, now) {
        tracing::warn!(client_addr = %addr, attempts = attempt.failed_count, "Promotion throttled");
        return Err(AppError::RateLimited(format!(
            "Too many attempts. Try again in {} minutes.",
            rate_limit::retry_minutes(retry_after)
        )));
    }

    let user = if codes_match(&req.security_code, setup_code) {
        db::users::find_by_email(&state.pool, &normalize_email(&req.email)).await?
    } else {
        None
    };

    let Some(user) = user else {
        let purged = db::promotion_attempts::purge_stale(&state.pool, rate_limit::stale_before(now))
            .await?;
        tracing::warn!(
            client_addr = %addr,
            failed_count = attempt.failed_count,
            purged,
            "Failed promotion attempt"
        );
        return Err(AppError::Forbidden(INVALID_CREDENTIALS.to_string()));
    };

    let user = db::users::set_role(&state.pool, user.id, Role::SuperAdmin).await?;
    db::promotion_attempts::clear(&state.pool, &addr).await?;

    tracing::info!(user_id = %user.id, client_addr = %addr, "User promoted to super admin");

    audit::log_event(
        &state.pool,
        user.organization_id,
        Some(user.id),
        "user.promoted",
        "user",
        Some(user.id),
        Some(serde_json::json!({ "clientAddr": addr })),
    )
    .await;

    Ok(Json(PromoteResponse {
        message: "User promoted to super admin".to_string(),
        user,
    }))
}

/// Constant-time comparison over digests, so length differences don't leak either.
fn codes_match(given: &str, expected: &str) -> bool {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    given.as_slice().ct_eq(expected.as_slice()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_compare_exactly() {
        assert!(codes_match("s3cret", "s3cret"));
        assert!(!codes_match("s3cret ", "s3cret"));
        assert!(!codes_match("", "s3cret"));
    }
}
