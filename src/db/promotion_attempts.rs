use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::PromotionAttempt;

/// Claims one attempt for `client_addr` before the code is checked, opening a
/// fresh window when the stored one is older than `window_secs` at `now`.
/// The upsert serializes on the row, so concurrent callers each see a
/// distinct count.
pub async fn reserve(
    pool: &PgPool,
    client_addr: &str,
    now: DateTime<Utc>,
    window_secs: i64,
) -> Result<PromotionAttempt, sqlx::Error> {
    sqlx::query_as::<_, PromotionAttempt>(
        "INSERT INTO promotion_attempts (client_addr, failed_count, window_start)
         VALUES ($1, 1, $2)
         ON CONFLICT (client_addr) DO UPDATE SET
            failed_count = CASE
                WHEN promotion_attempts.window_start + make_interval(secs => $3) <= $2 THEN 1
                ELSE promotion_attempts.failed_count + 1
            END,
            window_start = CASE
                WHEN promotion_attempts.window_start + make_interval(secs => $3) <= $2 THEN $2
                ELSE promotion_attempts.window_start
            END
         RETURNING *",
    )
    .bind(client_addr)
    .bind(now)
    .bind(window_secs as f64)
    .fetch_one(pool)
    .await
}

pub async fn clear(pool: &PgPool, client_addr: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM promotion_attempts WHERE client_addr = $1")
        .bind(client_addr)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drops entries whose window ended before `cutoff`.
pub async fn purge_stale(pool: &PgPool, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM promotion_attempts WHERE window_start < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
