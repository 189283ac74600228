use sqlx::PgPool;
use uuid::Uuid;

/// Records an audit event after a mutation. Failures are logged, never returned.
pub async fn log_event(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Option<Uuid>,
    action: &str,
    resource_type: &str,
    resource_id: Option<Uuid>,
    details: Option<serde_json::Value>,
) {
    if let Err(e) = crate::db::audit::log_event(
        pool,
        organization_id,
        user_id,
        action,
        resource_type,
        resource_id,
        details,
    )
    .await
    {
        tracing::error!(%organization_id, action, "Failed to log audit event: {e}");
    }
}
