use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::agent::RagAgent;
use crate::core::config::AppConfig;
use crate::llm::{EmbeddingProvider, LlmProvider, OpenAiCompatProvider};
use crate::rag::{InMemoryRagStore, KnowledgeBase};
use crate::tools::{RetrievalTool, ToolRegistry};

pub mod error;

pub use error::InitializationError;

/// Application state shared across all routes.
///
/// Holds the effective configuration, the knowledge base (documents plus
/// vector index), the tool registry and the agent that drives chat.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub knowledge: Arc<KnowledgeBase>,
    pub tools: Arc<ToolRegistry>,
    pub agent: Arc<RagAgent>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Builds OpenAI-compatible clients from the configuration and wires
    /// the rest of the state around them.
    pub async fn initialize(config: AppConfig) -> Result<Arc<Self>, InitializationError> {
        let llm = OpenAiCompatProvider::from_llm_config(&config.llm)
            .map_err(|e| InitializationError::Llm(e.into()))?;
        let embedder = OpenAiCompatProvider::from_embedding_config(&config.embedding)
            .map_err(|e| InitializationError::Embedding(e.into()))?;

        tracing::info!(
            "LLM: {} ({}), embeddings: {} ({})",
            llm.base_url(),
            config.llm.model,
            embedder.base_url(),
            config.embedding.model
        );

        Self::with_providers(config, Arc::new(llm), Arc::new(embedder)).await
    }

    /// Same as `initialize` but with caller-supplied model clients.
    pub async fn with_providers(
        config: AppConfig,
        llm: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Arc<Self>, InitializationError> {
        let knowledge = Arc::new(KnowledgeBase::new(
            embedder,
            Arc::new(InMemoryRagStore::new()),
        ));

        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(RetrievalTool::from_config(
            &config.agent,
            knowledge.clone(),
        )));
        let tools = Arc::new(registry);

        let agent = Arc::new(
            RagAgent::new(llm, tools.clone(), config.llm.clone(), &config.agent)
                .map_err(|e| InitializationError::Graph(e.into()))?,
        );

        if config.seed.enabled && !config.seed.documents.is_empty() {
            let count = knowledge
                .seed(&config.seed.documents, &config.seed.source)
                .await
                .map_err(|e| InitializationError::Seed(e.into()))?;
            tracing::info!("Seeded {} documents", count);
        }

        Ok(Arc::new(AppState {
            config: Arc::new(config),
            knowledge,
            tools,
            agent,
            started_at: Utc::now(),
        }))
    }
}
