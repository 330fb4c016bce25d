use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    chat::{
        dto::{ChatRequest, ChatResponse},
        services,
    },
    error::{ApiError, ApiJson},
    state::AppState,
};

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/api/chatbot", post(chatbot))
}

#[instrument(skip(state, payload))]
pub async fn chatbot(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let answer = services::ask(state.chat.as_deref(), &payload.message).await?;
    info!(user_id = caller.id, source = ?answer.source, "chat answered");
    Ok(Json(answer))
}
