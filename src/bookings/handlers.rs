use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    bookings::{
        dto::{BookingSummary, CancelBookingResponse, CreateBookingRequest, CreateBookingResponse},
        repo,
        repo_types::Booking,
        services::{cancel_refusal, prepare_booking, BookingStatus},
    },
    destinations,
    error::{ApiError, ApiJson},
    state::AppState,
};

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/my", get(my_bookings))
        .route("/api/bookings/:id/cancel", post(cancel_booking))
}

#[instrument(skip(state, payload))]
pub async fn create_booking(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), ApiError> {
    let booking = prepare_booking(payload)?;

    if let Some(destination_id) = booking.destination_id {
        if !destinations::repo::exists(&state.db, destination_id).await? {
            return Err(ApiError::not_found("Destination not found"));
        }
    }

    let saved = repo::insert(&state.db, caller.id, &booking).await?;
    info!(
        user_id = caller.id,
        booking_id = saved.id,
        total_amount = saved.total_amount,
        "booking created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            success: true,
            booking_id: saved.id,
            message: "Booking created successfully".into(),
            booking: BookingSummary::from(&saved),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn my_bookings(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(repo::list_by_user(&state.db, caller.id).await?))
}

#[instrument(skip(state))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<CancelBookingResponse>, ApiError> {
    if let Some(booking) = repo::set_status(&state.db, id, caller.id, BookingStatus::Cancelled).await? {
        info!(user_id = caller.id, booking_id = id, "booking cancelled");
        return Ok(Json(CancelBookingResponse {
            success: true,
            message: "Booking cancelled".into(),
            booking: BookingSummary::from(&booking),
        }));
    }

    let existing = repo::find_for_user(&state.db, id, caller.id).await?;
    Err(cancel_refusal(existing.as_ref()))
}
