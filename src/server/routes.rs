//! Route handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::info;

use super::dto::{ApiChatRequest, ApiResponse, MessageResponse};
use super::error::ApiError;
use super::state::AppState;

/// `GET /`
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the RAG API"))
}

/// `GET /status`
pub async fn status() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World"))
}

/// `POST /rag`: deterministic pipeline.
pub async fn rag(
    State(state): State<AppState>,
    payload: Result<Json<ApiChatRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(request) = payload?;
    let conversation = request.to_conversation()?;
    info!(messages = request.messages.len(), "pipeline request");

    let result = state
        .service()
        .pipeline()
        .run_with_cancel(&conversation, &state.request_token())
        .await?;
    Ok(Json(ApiResponse { result }))
}

/// `POST /rag-agent`: tool-calling agent.
pub async fn rag_agent(
    State(state): State<AppState>,
    payload: Result<Json<ApiChatRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(request) = payload?;
    let conversation = request.to_conversation()?;
    info!(messages = request.messages.len(), "agent request");

    let result = state
        .service()
        .agent()
        .run_with_cancel(&conversation, &state.request_token())
        .await?;
    Ok(Json(ApiResponse { result }))
}
