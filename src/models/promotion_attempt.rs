use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromotionAttempt {
    pub client_addr: String,
    pub failed_count: i32,
    pub window_start: DateTime<Utc>,
}
