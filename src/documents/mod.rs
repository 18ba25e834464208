//! In-memory document store.
//!
//! Documents get a fresh UUID and the next sequential index on insertion.
//! Indices are never reused, even after a delete.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub source: String,
    pub index: u64,
}

#[derive(Default)]
struct Inner {
    documents: Vec<Document>,
    next_index: u64,
}

#[derive(Default)]
pub struct DocumentStore {
    inner: RwLock<Inner>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends one document per content under a single write lock, so a
    /// batch always receives a contiguous run of indices.
    pub fn add<S: AsRef<str>>(&self, contents: &[S], source: &str) -> Vec<Document> {
        let mut inner = self.write();
        let mut created = Vec::with_capacity(contents.len());
        for content in contents {
            let document = Document {
                id: Uuid::new_v4().to_string(),
                content: content.as_ref().to_string(),
                source: source.to_string(),
                index: inner.next_index,
            };
            inner.next_index += 1;
            inner.documents.push(document.clone());
            created.push(document);
        }
        created
    }

    /// Snapshot of all documents in insertion order.
    pub fn list(&self) -> Vec<Document> {
        self.read().documents.clone()
    }

    pub fn count(&self) -> usize {
        self.read().documents.len()
    }

    /// Returns false when no document has this id.
    pub fn delete(&self, id: &str) -> bool {
        let mut inner = self.write();
        match inner.documents.iter().position(|d| d.id == id) {
            Some(pos) => {
                inner.documents.remove(pos);
                true
            }
            None => false,
        }
    }
}
