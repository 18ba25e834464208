use std::sync::Arc;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "embedding_api": state.config.embedding.base_url,
        "llm_api": state.config.llm.base_url,
        "documents_count": state.knowledge.count(),
        "started_at": state.started_at.to_rfc3339(),
    }))
}
