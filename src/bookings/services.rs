use serde_json::{Map, Value};
use time::Date;

use crate::bookings::dto::CreateBookingRequest;
use crate::bookings::repo_types::Booking;
use crate::dates::{parse_iso_date, validate_range};
use crate::error::ApiError;

/// Goods and services tax applied to the base amount.
pub const GST_RATE: f64 = 0.18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingAmounts {
    pub base: f64,
    pub gst: f64,
    pub total: f64,
}

/// base = Σ price × travelers over option entries carrying a `price`;
/// gst = base × 18%; total = base + gst. Prices must be non-negative numbers.
pub fn compute_amounts(options: &Map<String, Value>, travelers: i32) -> Result<BookingAmounts, ApiError> {
    let mut base = 0.0;
    for (service_type, option) in options {
        let Some(price) = option.as_object().and_then(|o| o.get("price")) else {
            continue;
        };
        let price = price
            .as_f64()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| ApiError::validation(format!("Invalid price for {service_type}")))?;
        base += price * f64::from(travelers);
    }
    let gst = base * GST_RATE;
    Ok(BookingAmounts {
        base,
        gst,
        total: base + gst,
    })
}

/// Why a cancel changed nothing, given the caller's booking (if any).
pub fn cancel_refusal(existing: Option<&Booking>) -> ApiError {
    match existing.map(|b| BookingStatus::parse(&b.status)) {
        None => ApiError::not_found("Booking not found"),
        Some(Some(BookingStatus::Cancelled)) => ApiError::validation("Booking is already cancelled"),
        Some(_) => ApiError::Conflict("Booking was modified, try again".into()),
    }
}

/// Validated booking ready to insert.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub destination_id: Option<i64>,
    pub services: Value,
    pub options: Value,
    pub traveler_name: String,
    pub traveler_email: String,
    pub traveler_phone: String,
    pub num_travelers: i32,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub special_requirements: String,
    pub amounts: BookingAmounts,
    pub status: BookingStatus,
    pub payment_method: String,
}

/// Validates a booking payload and prices it. Nothing here touches the database.
pub fn prepare_booking(req: CreateBookingRequest) -> Result<NewBooking, ApiError> {
    let travelers = req.travelers.unwrap_or(1);
    if !(1..=i64::from(i32::MAX)).contains(&travelers) {
        return Err(ApiError::validation("Travelers must be at least 1"));
    }
    let travelers = travelers as i32;

    let start_date = parse_iso_date("startDate", req.start_date.as_deref())?;
    let end_date = parse_iso_date("endDate", req.end_date.as_deref())?;
    validate_range(start_date, end_date)?;

    let amounts = compute_amounts(&req.options, travelers)?;

    let payment_method = req
        .payment_method
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "card".to_string());

    Ok(NewBooking {
        destination_id: req.destination_id,
        services: Value::Array(req.services),
        options: Value::Object(req.options),
        traveler_name: req.traveler.name.trim().to_string(),
        traveler_email: req.traveler.email.trim().to_string(),
        traveler_phone: req.traveler.phone.trim().to_string(),
        num_travelers: travelers,
        start_date,
        end_date,
        special_requirements: req.special_requirements.unwrap_or_default(),
        amounts,
        // No payment capture step: bookings are confirmed on creation.
        status: BookingStatus::Confirmed,
        payment_method,
    })
}
