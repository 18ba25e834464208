use std::sync::Arc;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddDocumentsRequest {
    pub documents: Vec<String>,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "api".to_string()
}

pub async fn add_documents(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddDocumentsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let added = state
        .knowledge
        .add_documents(&payload.documents, &payload.source)
        .await?;
    let total = state.knowledge.count();

    tracing::info!(
        "Added {} documents from '{}' (total {})",
        added.len(),
        payload.source,
        total
    );

    Ok(Json(json!({
        "message": format!("Added {} documents", added.len()),
        "added_count": added.len(),
        "total_count": total,
        "documents": added
    })))
}

pub async fn list_documents(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let documents = state.knowledge.list();
    Json(json!({
        "total": documents.len(),
        "documents": documents
    }))
}

pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.knowledge.delete(&doc_id).await? {
        return Err(ApiError::NotFound("Document not found".to_string()));
    }

    let total = state.knowledge.count();
    tracing::info!("Deleted document {} (total {})", doc_id, total);

    Ok(Json(json!({
        "message": format!("Document {} deleted", doc_id),
        "total_count": total
    })))
}
