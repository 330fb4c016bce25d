use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::bookings::repo_types::Booking;

#[derive(Debug, Default, Deserialize)]
pub struct TravelerContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Booking payload as sent by the booking page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default, alias = "destination_id")]
    pub destination_id: Option<i64>,
    #[serde(default)]
    pub services: Vec<Value>,
    /// service type -> selected option, e.g. `{"hotel": {"name": "...", "price": 100}}`
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default, alias = "num_travelers")]
    pub travelers: Option<i64>,
    #[serde(default, alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub traveler: TravelerContact,
    #[serde(default, alias = "special_requirements")]
    pub special_requirements: Option<String>,
    #[serde(default, alias = "payment_method")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingSummary {
    pub id: i64,
    pub total_amount: f64,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Booking> for BookingSummary {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id,
            total_amount: b.total_amount,
            status: b.status.clone(),
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub success: bool,
    pub booking_id: i64,
    pub message: String,
    pub booking: BookingSummary,
}

#[derive(Debug, Serialize)]
pub struct CancelBookingResponse {
    pub success: bool,
    pub message: String,
    pub booking: BookingSummary,
}
