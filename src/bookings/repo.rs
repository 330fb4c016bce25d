use sqlx::PgPool;

use crate::bookings::repo_types::Booking;
use crate::bookings::services::{BookingStatus, NewBooking};

const BOOKING_COLUMNS: &str = "id, user_id, destination_id, services, options, traveler_name, \
     traveler_email, traveler_phone, num_travelers, start_date, end_date, special_requirements, \
     amount, gst, total_amount, status, payment_method, created_at, updated_at";

/// Single-statement insert; a failure leaves nothing behind.
pub async fn insert(db: &PgPool, user_id: i64, b: &NewBooking) -> anyhow::Result<Booking> {
    let booking = sqlx::query_as::<_, Booking>(&format!(
        r#"
        INSERT INTO bookings
            (user_id, destination_id, services, options, traveler_name, traveler_email,
             traveler_phone, num_travelers, start_date, end_date, special_requirements,
             amount, gst, total_amount, status, payment_method)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(b.destination_id)
    .bind(&b.services)
    .bind(&b.options)
    .bind(&b.traveler_name)
    .bind(&b.traveler_email)
    .bind(&b.traveler_phone)
    .bind(b.num_travelers)
    .bind(b.start_date)
    .bind(b.end_date)
    .bind(&b.special_requirements)
    .bind(b.amounts.base)
    .bind(b.amounts.gst)
    .bind(b.amounts.total)
    .bind(b.status.as_str())
    .bind(&b.payment_method)
    .fetch_one(db)
    .await?;
    Ok(booking)
}

/// The caller's bookings, newest first.
pub async fn list_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Booking>> {
    let rows = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_for_user(db: &PgPool, id: i64, user_id: i64) -> anyhow::Result<Option<Booking>> {
    let row = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Moves a booking to `status` unless it already has it. `None` when nothing changed.
pub async fn set_status(
    db: &PgPool,
    id: i64,
    user_id: i64,
    status: BookingStatus,
) -> anyhow::Result<Option<Booking>> {
    let row = sqlx::query_as::<_, Booking>(&format!(
        r#"
        UPDATE bookings
           SET status = $3, updated_at = now()
         WHERE id = $1 AND user_id = $2 AND status <> $3
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(status.as_str())
    .fetch_optional(db)
    .await?;
    Ok(row)
}
