use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Invitation, Role};

pub async fn create(
    pool: &PgPool,
    organization_id: Uuid,
    email: &str,
    token_hash: &str,
    role: Role,
    expires_at: DateTime<Utc>,
    created_by: Uuid,
) -> Result<Invitation, sqlx::Error> {
    sqlx::query_as::<_, Invitation>(
        "INSERT INTO invitations (organization_id, email, token_hash, role, expires_at, created_by)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(organization_id)
    .bind(email)
    .bind(token_hash)
    .bind(role)
    .bind(expires_at)
    .bind(created_by)
    .fetch_one(pool)
    .await
}

pub async fn find_by_token_hash<'e, E: PgExecutor<'e>>(
    executor: E,
    token_hash: &str,
) -> Result<Option<Invitation>, sqlx::Error> {
    sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE token_hash = $1")
        .bind(token_hash)
        .fetch_optional(executor)
        .await
}

/// Consumes the invitation if it is still unused and unexpired at `now`.
/// Returns `None` when another request already consumed it.
pub async fn mark_used<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<Invitation>, sqlx::Error> {
    sqlx::query_as::<_, Invitation>(
        "UPDATE invitations SET used_at = $2
         WHERE id = $1 AND used_at IS NULL AND expires_at >= $2
         RETURNING *",
    )
    .bind(id)
    .bind(now)
    .fetch_optional(executor)
    .await
}
