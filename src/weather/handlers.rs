use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    destinations,
    error::ApiError,
    state::AppState,
    weather::{
        dto::{Recommendation, WeatherAdvisory},
        services::{self, RECOMMENDATION_CANDIDATES},
    },
};

pub fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/api/weather/:id", get(get_weather))
        .route("/api/weather-recommendations", get(weather_recommendations))
}

#[instrument(skip(state))]
pub async fn get_weather(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<WeatherAdvisory>, ApiError> {
    let destination = destinations::repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Destination not found"))?;
    let coordinates = destination
        .coordinates()
        .ok_or_else(|| ApiError::not_found("Destination has no coordinates"))?;

    let advisory = services::advisory(state.weather.as_deref(), &destination, coordinates).await;
    debug!(destination_id = id, available = advisory.is_available(), "weather advisory");
    Ok(Json(advisory))
}

#[instrument(skip(state))]
pub async fn weather_recommendations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let candidates =
        destinations::repo::top_with_coordinates(&state.db, RECOMMENDATION_CANDIDATES).await?;
    let picked = services::recommendations(state.weather.as_deref(), &candidates).await;
    debug!(candidates = candidates.len(), picked = picked.len(), "weather recommendations");
    Ok(Json(picked))
}
