use std::sync::Arc;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default = "default_conversation_id")]
    pub conversation_id: String,
}

fn default_conversation_id() -> String {
    "default".to_string()
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        "Chat request (conversation {}): {}",
        payload.conversation_id,
        payload.query
    );

    let outcome = state
        .agent
        .invoke(&payload.conversation_id, &payload.query)
        .await?;

    tracing::info!(
        "Chat response (conversation {}): {} chars, {} sources, path {}",
        payload.conversation_id,
        outcome.answer.chars().count(),
        outcome.sources.len(),
        outcome.path.join(" -> ")
    );

    Ok(Json(json!({
        "answer": outcome.answer,
        "sources": outcome.sources
    })))
}
