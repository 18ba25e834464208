// Node trait and types
// Base abstraction for graph nodes

use async_trait::async_trait;

use crate::core::config::LlmConfig;
use crate::core::errors::ApiError;
use crate::llm::LlmProvider;
use crate::tools::ToolRegistry;

use super::state::AgentState;

/// Context passed to nodes during execution
pub struct NodeContext<'a> {
    /// Chat model used by the generate step
    pub llm: &'a dyn LlmProvider,
    /// Tools offered to the model and executed by the call_tool step
    pub tools: &'a ToolRegistry,
    /// Sampling settings forwarded with every completion
    pub llm_config: &'a LlmConfig,
}

/// Output from a node execution
#[derive(Debug, Clone)]
pub enum NodeOutput {
    /// Follow the default edge
    Continue,
    /// Branch to one of the specified nodes based on condition
    Branch(String),
    /// Graph execution complete
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphErrorKind {
    /// A node failed while doing its own work.
    Node,
    /// The model or embedding service failed.
    Upstream,
    /// The runtime hit its step limit.
    StepLimit,
    /// Graph wiring is broken (missing node, no matching edge).
    Routing,
}

/// Graph execution error
///
/// Includes an `execution_trace` recording the node IDs visited before the
/// error occurred.
#[derive(Debug, Clone)]
pub struct GraphError {
    pub node_id: String,
    pub message: String,
    pub kind: GraphErrorKind,
    /// Ordered list of node IDs executed before this error, most-recent last.
    pub execution_trace: Vec<String>,
}

impl GraphError {
    pub fn new(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            message: message.into(),
            kind: GraphErrorKind::Node,
            execution_trace: Vec::new(),
        }
    }

    pub fn upstream(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(node_id, message).with_kind(GraphErrorKind::Upstream)
    }

    pub fn routing(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(node_id, message).with_kind(GraphErrorKind::Routing)
    }

    pub fn with_kind(mut self, kind: GraphErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_message_prefix(mut self, prefix: &str) -> Self {
        self.message = format!("{}: {}", prefix, self.message);
        self
    }

    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.execution_trace = trace;
        self
    }

    /// Wraps a failed service call made from inside a node.
    pub fn from_api(node_id: impl Into<String>, err: ApiError) -> Self {
        match err {
            ApiError::Upstream(msg) => Self::upstream(node_id, msg),
            other => Self::new(node_id, other.detail().to_string()),
        }
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        match err.kind {
            GraphErrorKind::StepLimit => ApiError::Internal(err.message),
            GraphErrorKind::Upstream => ApiError::Upstream(err.to_string()),
            GraphErrorKind::Node | GraphErrorKind::Routing => ApiError::Internal(err.to_string()),
        }
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.execution_trace.is_empty() {
            write!(f, "Graph error in {}: {}", self.node_id, self.message)
        } else {
            write!(
                f,
                "Graph error in {} (trace: {}): {}",
                self.node_id,
                self.execution_trace.join(" -> "),
                self.message
            )
        }
    }
}

impl std::error::Error for GraphError {}

/// Node trait - all graph nodes implement this
#[async_trait]
pub trait Node: Send + Sync {
    /// Unique identifier for this node
    fn id(&self) -> &'static str;

    /// Execute the node logic
    async fn execute(
        &self,
        state: &mut AgentState,
        ctx: &mut NodeContext<'_>,
    ) -> Result<NodeOutput, GraphError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_limit_keeps_plain_message() {
        let err = GraphError::new("runtime", "Maximum steps (25) exceeded")
            .with_kind(GraphErrorKind::StepLimit)
            .with_trace(vec!["generate".into(), "call_tool".into()]);
        let api: ApiError = err.into();
        assert!(matches!(api, ApiError::Internal(ref m) if m == "Maximum steps (25) exceeded"));
    }

    #[test]
    fn upstream_failures_stay_upstream() {
        let err = GraphError::from_api("generate", ApiError::Upstream("502 from LLM".into()));
        assert_eq!(err.kind, GraphErrorKind::Upstream);
        let api: ApiError = err.into();
        assert!(matches!(api, ApiError::Upstream(_)));
    }

    #[test]
    fn display_includes_trace() {
        let err = GraphError::new("call_tool", "Unknown tool: x")
            .with_trace(vec!["generate".into(), "call_tool".into()]);
        assert_eq!(
            err.to_string(),
            "Graph error in call_tool (trace: generate -> call_tool): Unknown tool: x"
        );
    }
}
