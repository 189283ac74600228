use chrono::{DateTime, Duration, Utc};

use crate::models::PromotionAttempt;

/// Promotion attempts allowed per address within one window. Success clears the count.
pub const PROMOTION_MAX_FAILURES: i32 = 5;

/// Length of the promotion throttle window.
pub const PROMOTION_WINDOW_SECS: i64 = 15 * 60;

/// Whether a reserved attempt may go on to compare the code at `now`.
/// `attempt` already counts the current request. Returns `Err` with the
/// seconds left in the window when the address is locked out.
pub fn check_promotion(attempt: &PromotionAttempt, now: DateTime<Utc>) -> Result<(), i64> {
    let elapsed = (now - attempt.window_start).num_seconds();
    if elapsed >= PROMOTION_WINDOW_SECS {
        return Ok(());
    }

    if attempt.failed_count > PROMOTION_MAX_FAILURES {
        return Err(PROMOTION_WINDOW_SECS - elapsed.max(0));
    }

    Ok(())
}

/// Whole minutes to report for a retry delay, rounded up.
pub fn retry_minutes(retry_after_secs: i64) -> i64 {
    ((retry_after_secs + 59) / 60).max(1)
}

/// Cutoff before which stored windows are no longer relevant.
pub fn stale_before(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(PROMOTION_WINDOW_SECS)
}
