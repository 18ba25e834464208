//! RagStore trait: abstract interface for vector storage backends.
//!
//! The knowledge base talks to vectors only through this trait; the
//! shipped implementation is `InMemoryRagStore`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use crate::documents::Document;

/// Result of a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    /// Cosine similarity (higher = better), passed through unmodified.
    pub score: f32,
}

#[async_trait]
pub trait RagStore: Send + Sync {
    /// Insert documents with their embedding vectors. All or nothing.
    async fn insert_batch(&self, items: Vec<(Document, Vec<f32>)>) -> Result<(), ApiError>;

    /// Top `limit` documents by descending similarity to the query vector.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredDocument>, ApiError>;

    /// Delete a document's vector by document id.
    async fn delete(&self, document_id: &str) -> Result<bool, ApiError>;

    async fn count(&self) -> Result<usize, ApiError>;
}
