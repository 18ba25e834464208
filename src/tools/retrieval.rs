use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;
use crate::core::config::AgentConfig;
use crate::core::errors::ApiError;
use crate::rag::KnowledgeBase;

/// Vector search over the knowledge base, exposed to the model.
pub struct RetrievalTool {
    name: String,
    description: String,
    k: usize,
    knowledge: Arc<KnowledgeBase>,
}

impl RetrievalTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        k: usize,
        knowledge: Arc<KnowledgeBase>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            k,
            knowledge,
        }
    }

    pub fn from_config(config: &AgentConfig, knowledge: Arc<KnowledgeBase>) -> Self {
        Self::new(
            config.tool_name.clone(),
            config.tool_description.clone(),
            config.retrieval_k,
            knowledge,
        )
    }
}

#[async_trait]
impl Tool for RetrievalTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The question to search for"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: &Value) -> Result<String, ApiError> {
        let query = args
            .get("query")
            .or_else(|| args.get("q"))
            .or_else(|| args.get("input"))
            .and_then(|v| v.as_str())
            .or_else(|| args.as_str())
            .unwrap_or("")
            .trim()
            .to_string();

        if query.is_empty() {
            return Err(ApiError::BadRequest("Search query missing".to_string()));
        }

        tracing::info!("Retrieval query: {}", query);
        let hits = self.knowledge.search(&query, self.k).await?;
        tracing::info!("Retrieved {} documents", hits.len());

        Ok(hits
            .iter()
            .map(|hit| hit.document.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::EmbeddingProvider;
    use crate::rag::InMemoryRagStore;

    struct LengthEmbedder;

    #[async_trait]
    impl EmbeddingProvider for LengthEmbedder {
        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
            Ok(inputs
                .iter()
                .map(|s| vec![1.0, s.chars().count() as f32])
                .collect())
        }
    }

    async fn tool_with(docs: &[&str], k: usize) -> RetrievalTool {
        let kb = Arc::new(KnowledgeBase::new(
            Arc::new(LengthEmbedder),
            Arc::new(InMemoryRagStore::new()),
        ));
        let contents: Vec<String> = docs.iter().map(|s| s.to_string()).collect();
        kb.add_documents(&contents, "test").await.unwrap();
        RetrievalTool::new("retrieve_blog_posts", "search", k, kb)
    }

    #[tokio::test]
    async fn joins_hits_with_blank_lines() {
        let tool = tool_with(&["aa", "bb"], 3).await;
        let out = tool.call(&json!({"query": "cc"})).await.unwrap();
        let parts: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(parts.len(), 2);
        assert!(parts.contains(&"aa") && parts.contains(&"bb"));
    }

    #[tokio::test]
    async fn respects_k() {
        let tool = tool_with(&["a", "bb", "ccc", "dddd"], 2).await;
        let out = tool.call(&json!({"query": "x"})).await.unwrap();
        assert_eq!(out.split("\n\n").count(), 2);
    }

    #[tokio::test]
    async fn missing_query_is_rejected() {
        let tool = tool_with(&["a"], 3).await;
        assert!(tool.call(&json!({})).await.is_err());
        assert!(tool.call(&json!({"query": "   "})).await.is_err());
    }

    #[tokio::test]
    async fn accepts_bare_string_arguments() {
        let tool = tool_with(&["a"], 3).await;
        assert_eq!(tool.call(&json!("anything")).await.unwrap(), "a");
    }

    #[test]
    fn definition_requires_query() {
        let kb = Arc::new(KnowledgeBase::new(
            Arc::new(LengthEmbedder),
            Arc::new(InMemoryRagStore::new()),
        ));
        let tool = RetrievalTool::from_config(&AgentConfig::default(), kb);
        let def = tool.definition();
        assert_eq!(def.name, "retrieve_blog_posts");
        assert_eq!(def.parameters["required"][0], "query");
    }
}
