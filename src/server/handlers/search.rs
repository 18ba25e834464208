use std::sync::Arc;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    3
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) =
        params.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let hits = state.knowledge.search(&params.query, params.k).await?;

    let results: Vec<Value> = hits
        .into_iter()
        .map(|hit| {
            json!({
                "content": hit.document.content,
                "metadata": {
                    "id": hit.document.id,
                    "source": hit.document.source,
                    "index": hit.document.index
                },
                "score": hit.score
            })
        })
        .collect();

    Ok(Json(json!({
        "query": params.query,
        "k": params.k,
        "results_count": results.len(),
        "results": results
    })))
}
