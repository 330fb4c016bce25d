use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    dates::{parse_iso_date, validate_range},
    error::{ApiError, ApiJson},
    plans::{
        dto::{SavePlanRequest, SavePlanResponse},
        repo,
        repo_types::TravelPlan,
    },
    state::AppState,
};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/plan/save", post(save_plan))
        .route("/api/plan/my", get(my_plans))
}

#[instrument(skip(state, payload))]
pub async fn save_plan(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<SavePlanRequest>,
) -> Result<(StatusCode, Json<SavePlanResponse>), ApiError> {
    let start_date = parse_iso_date("startDate", payload.start_date.as_deref())?;
    let end_date = parse_iso_date("endDate", payload.end_date.as_deref())?;
    validate_range(start_date, end_date)?;

    let route = payload.route.filter(|r| !r.is_null());
    let plan = repo::insert(
        &state.db,
        caller.id,
        &payload.destinations,
        start_date,
        end_date,
        route.as_ref(),
    )
    .await?;

    info!(user_id = caller.id, plan_id = plan.id, stops = plan.destination_ids.len(), "travel plan saved");
    Ok((
        StatusCode::CREATED,
        Json(SavePlanResponse {
            success: true,
            plan_id: plan.id,
            message: "Travel plan saved successfully".into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn my_plans(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<TravelPlan>>, ApiError> {
    Ok(Json(repo::list_by_user(&state.db, caller.id).await?))
}
