//! Knowledge base: the document store plus its vector index.
//!
//! Every mutation goes through here so the two never drift apart:
//! contents are embedded before any document is allocated, and a failed
//! vector insert rolls the new documents back out of the store. Adds and
//! deletes are serialized so a delete never lands between the two writes.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::store::{RagStore, ScoredDocument};
use crate::core::errors::ApiError;
use crate::documents::{Document, DocumentStore};
use crate::llm::EmbeddingProvider;

pub struct KnowledgeBase {
    documents: DocumentStore,
    embedder: Arc<dyn EmbeddingProvider>,
    vectors: Arc<dyn RagStore>,
    /// Held across the document write and the matching vector write.
    write_lock: Mutex<()>,
}

impl KnowledgeBase {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, vectors: Arc<dyn RagStore>) -> Self {
        Self {
            documents: DocumentStore::new(),
            embedder,
            vectors,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn add_documents(
        &self,
        contents: &[String],
        source: &str,
    ) -> Result<Vec<Document>, ApiError> {
        if contents.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self.embedder.embed(contents).await?;
        if embeddings.len() != contents.len() {
            return Err(ApiError::Upstream(format!(
                "Expected {} embeddings, got {}",
                contents.len(),
                embeddings.len()
            )));
        }

        let _guard = self.write_lock.lock().await;
        let created = self.documents.add(contents, source);
        let items: Vec<(Document, Vec<f32>)> =
            created.iter().cloned().zip(embeddings).collect();

        if let Err(err) = self.vectors.insert_batch(items).await {
            for document in &created {
                self.documents.delete(&document.id);
            }
            tracing::warn!(
                "Rolled back {} documents after vector insert failure: {}",
                created.len(),
                err
            );
            return Err(err);
        }

        tracing::debug!(
            "Indexed {} documents from source '{}' (total {})",
            created.len(),
            source,
            self.documents.count()
        );
        Ok(created)
    }

    pub fn list(&self) -> Vec<Document> {
        self.documents.list()
    }

    pub fn count(&self) -> usize {
        self.documents.count()
    }

    /// Removes the document and its vector; false when the id is unknown.
    pub async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let _guard = self.write_lock.lock().await;
        if !self.documents.delete(id) {
            return Ok(false);
        }
        if !self.vectors.delete(id).await? {
            tracing::warn!("Document {} had no vector in the index", id);
        }
        Ok(true)
    }

    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, ApiError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let mut embeddings = self.embedder.embed(&[query.to_string()]).await?;
        let query_embedding = embeddings
            .pop()
            .ok_or_else(|| ApiError::Upstream("No embedding returned for query".to_string()))?;
        self.vectors.search(&query_embedding, k).await
    }

    /// Loads startup documents; returns how many were added.
    pub async fn seed(&self, contents: &[String], source: &str) -> Result<usize, ApiError> {
        let added = self.add_documents(contents, source).await?;
        Ok(added.len())
    }
}
