use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use tracing::info;
use validator::Validate;

use crate::agents::ChatAgent;
use crate::models::{AppState, ChatRequest, ChatResponse};
use crate::session::cookie::session_from_headers;
use crate::types::{AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    request
        .validate()
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    let session_id = session_from_headers(&headers, &state.config.session.cookie_name)
        .ok_or(AppError::MissingSession)?;
    let session = state
        .sessions
        .get(&session_id)
        .await
        .ok_or(AppError::MissingSession)?;

    info!(session = %session_id, "Chat question received");

    let answer = ChatAgent::answer(&state.llm, &state.config.llm, &session, &request.query).await?;

    Ok(Json(ChatResponse { answer }))
}
