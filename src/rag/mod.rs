//! RAG (Retrieval-Augmented Generation) module.
//!
//! This module provides:
//! - `RagStore`: vector storage abstraction, with `InMemoryRagStore`
//! - `KnowledgeBase`: document store and vector index kept in lockstep

mod knowledge;
mod memory;
mod store;

pub use knowledge::KnowledgeBase;
pub use memory::InMemoryRagStore;
pub use store::{RagStore, ScoredDocument};
