use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiJson},
    reviews::{
        dto::{CreateReviewRequest, CreateReviewResponse},
        repo,
        repo_types::ReviewView,
        services::validate_rating,
    },
    state::AppState,
};

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", post(create_review))
        .route("/api/reviews/:id", get(list_reviews))
}

#[instrument(skip(state, payload))]
pub async fn create_review(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<CreateReviewResponse>), ApiError> {
    let (Some(destination_id), Some(rating)) = (payload.destination_id, payload.rating) else {
        return Err(ApiError::validation("Destination ID and rating are required"));
    };
    let rating = validate_rating(rating)?;
    let comment = payload.comment.unwrap_or_default();

    let (review, mean) =
        repo::insert_and_rerate(&state.db, caller.id, destination_id, rating, comment.trim())
            .await?
            .ok_or_else(|| ApiError::not_found("Destination not found"))?;

    info!(
        user_id = caller.id,
        destination_id,
        review_id = review.id,
        destination_rating = mean,
        "review added"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateReviewResponse {
            success: true,
            review_id: review.id,
            message: "Review added successfully".into(),
            destination_rating: mean,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(destination_id): Path<i64>,
) -> Result<Json<Vec<ReviewView>>, ApiError> {
    Ok(Json(repo::list_for_destination(&state.db, destination_id, None).await?))
}
