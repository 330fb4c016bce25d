use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub destination_id: i64,
    pub rating: i32,
    pub comment: String,
    pub created_at: OffsetDateTime,
}

/// Review joined with its author's username, as served to clients.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewView {
    pub id: i64,
    pub user: String,
    pub rating: i32,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
