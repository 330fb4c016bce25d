use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::dates::serialize_opt_date;

/// Booking record; serialized as the `/api/bookings/my` item shape.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub destination_id: Option<i64>,
    pub services: Value, // JSON array
    pub options: Value,  // JSON object
    pub traveler_name: String,
    pub traveler_email: String,
    pub traveler_phone: String,
    pub num_travelers: i32,
    #[serde(serialize_with = "serialize_opt_date")]
    pub start_date: Option<Date>,
    #[serde(serialize_with = "serialize_opt_date")]
    pub end_date: Option<Date>,
    pub special_requirements: String,
    pub amount: f64, // base, before tax
    pub gst: f64,
    pub total_amount: f64,
    pub status: String,
    pub payment_method: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
