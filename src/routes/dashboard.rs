use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::auth::extractor::CurrentUser;
use crate::db;
use crate::db::dashboard::DashboardStats;
use crate::error::AppError;
use crate::state::SharedState;

pub async fn stats(
    auth: CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats =
        db::dashboard::stats(&state.pool, auth.organization_id(), month_start(Utc::now())).await?;
    Ok(Json(stats))
}

/// Midnight UTC on the first day of `now`'s month.
fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|start| start.and_utc())
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn month_starts_at_first_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 3, 17, 15, 42, 7).unwrap();
        assert_eq!(month_start(now), Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn first_of_month_is_its_own_start() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(month_start(now), now);
    }
}
