//! In-memory vector table with brute-force cosine search.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::store::{RagStore, ScoredDocument};
use crate::core::errors::ApiError;
use crate::documents::Document;
use crate::vector_math::rank_descending_by_cosine;

#[derive(Default)]
struct Table {
    documents: Vec<Document>,
    embeddings: Vec<Vec<f32>>,
    dimension: Option<usize>,
}

#[derive(Default)]
pub struct InMemoryRagStore {
    table: RwLock<Table>,
}

impl InMemoryRagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RagStore for InMemoryRagStore {
    async fn insert_batch(&self, items: Vec<(Document, Vec<f32>)>) -> Result<(), ApiError> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);

        // Validate the whole batch before touching the table.
        let mut dimension = table.dimension;
        for (document, embedding) in &items {
            if embedding.is_empty() {
                return Err(ApiError::Upstream(format!(
                    "Empty embedding for document {}",
                    document.id
                )));
            }
            match dimension {
                Some(dim) if dim != embedding.len() => {
                    return Err(ApiError::Upstream(format!(
                        "Embedding dimension mismatch for document {}: expected {}, got {}",
                        document.id,
                        dim,
                        embedding.len()
                    )));
                }
                Some(_) => {}
                None => dimension = Some(embedding.len()),
            }
        }

        table.dimension = dimension;
        for (document, embedding) in items {
            table.documents.push(document);
            table.embeddings.push(embedding);
        }
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredDocument>, ApiError> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        if limit == 0 || table.documents.is_empty() {
            return Ok(Vec::new());
        }

        let ranked = rank_descending_by_cosine(query_embedding, &table.embeddings)?;
        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(idx, score)| ScoredDocument {
                document: table.documents[idx].clone(),
                score,
            })
            .collect())
    }

    async fn delete(&self, document_id: &str) -> Result<bool, ApiError> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let Some(pos) = table.documents.iter().position(|d| d.id == document_id) else {
            return Ok(false);
        };
        table.documents.remove(pos);
        table.embeddings.remove(pos);
        if table.documents.is_empty() {
            table.dimension = None;
        }
        Ok(true)
    }

    async fn count(&self) -> Result<usize, ApiError> {
        Ok(self
            .table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .documents
            .len())
    }
}
