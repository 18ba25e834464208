//! Retrieval agent: runs the generate / call_tool graph for one query.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::core::config::{AgentConfig, LlmConfig};
use crate::core::errors::ApiError;
use crate::graph::{
    build_rag_graph, AgentPhase, AgentState, GraphError, GraphRuntime, NodeContext,
};
use crate::llm::{ChatMessage, LlmProvider};
use crate::tools::ToolRegistry;


/// Result of one agent invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AgentOutcome {
    pub answer: String,
    pub sources: Vec<String>,
    pub messages: Vec<ChatMessage>,
    /// Node IDs in execution order.
    pub path: Vec<String>,
    pub phase: AgentPhase,
}

pub struct RagAgent {
    graph: GraphRuntime,
    llm: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    llm_config: LlmConfig,
    system_prompt: Option<String>,
    request_timeout: Duration,
}

impl RagAgent {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        llm_config: LlmConfig,
        agent_config: &AgentConfig,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            graph: build_rag_graph(agent_config.max_steps)?,
            llm,
            tools,
            llm_config,
            system_prompt: agent_config.system_prompt.clone(),
            request_timeout: Duration::from_secs(agent_config.request_timeout_secs),
        })
    }

    pub async fn invoke(
        &self,
        conversation_id: &str,
        query: &str,
    ) -> Result<AgentOutcome, ApiError> {
        match tokio::time::timeout(self.request_timeout, self.run(conversation_id, query)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(format!(
                "Agent did not finish within {}s",
                self.request_timeout.as_secs()
            ))),
        }
    }

    async fn run(&self, conversation_id: &str, query: &str) -> Result<AgentOutcome, ApiError> {
        let mut state = AgentState::new(conversation_id, self.system_prompt.as_deref(), query);
        let mut ctx = NodeContext {
            llm: self.llm.as_ref(),
            tools: self.tools.as_ref(),
            llm_config: &self.llm_config,
        };

        let path = self.graph.run(&mut state, &mut ctx).await.map_err(|err| {
            tracing::warn!(
                "Agent run failed for conversation {}: {}",
                conversation_id,
                err
            );
            ApiError::from(err)
        })?;

        tracing::debug!(
            "Agent finished conversation {} in phase `{}` after {} steps ({} tool calls)",
            conversation_id,
            state.phase.as_str(),
            path.len(),
            state.tool_steps
        );

        Ok(AgentOutcome {
            answer: state.answer(),
            sources: state.sources(),
            messages: state.messages,
            path,
            phase: state.phase,
        })
    }
}
