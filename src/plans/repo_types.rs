use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::dates::serialize_opt_date;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TravelPlan {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub destination_ids: Vec<i64>, // visiting order
    #[serde(serialize_with = "serialize_opt_date")]
    pub start_date: Option<Date>,
    #[serde(serialize_with = "serialize_opt_date")]
    pub end_date: Option<Date>,
    pub route_data: Option<Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
