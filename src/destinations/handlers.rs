use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    destinations::{
        dto::{DestinationDetails, DestinationFilter, DestinationQuery},
        repo,
        repo_types::{Destination, StateCount},
    },
    error::ApiError,
    reviews,
    state::AppState,
};

/// Reviews inlined into a destination detail response.
const DETAIL_REVIEW_LIMIT: i64 = 10;

pub fn destination_routes() -> Router<AppState> {
    Router::new()
        .route("/api/destinations", get(list_destinations))
        .route("/api/destination/:id", get(get_destination))
        .route("/api/states", get(list_states))
}

#[instrument(skip(state))]
pub async fn list_destinations(
    State(state): State<AppState>,
    Query(query): Query<DestinationQuery>,
) -> Result<Json<Vec<Destination>>, ApiError> {
    let filter = DestinationFilter::from(query);
    let rows = repo::list(&state.db, &filter).await?;
    debug!(count = rows.len(), sort = ?filter.sort, "destinations listed");
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn get_destination(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DestinationDetails>, ApiError> {
    let destination = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Destination not found"))?;
    let reviews = reviews::repo::list_for_destination(&state.db, id, Some(DETAIL_REVIEW_LIMIT)).await?;
    Ok(Json(DestinationDetails {
        destination,
        reviews,
    }))
}

#[instrument(skip(state))]
pub async fn list_states(State(state): State<AppState>) -> Result<Json<Vec<StateCount>>, ApiError> {
    Ok(Json(repo::list_states(&state.db).await?))
}
