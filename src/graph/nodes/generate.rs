// Generate Node
// Asks the model for the next assistant turn

use async_trait::async_trait;

use super::{GENERATE, TOOL_CALL};
use crate::graph::node::{GraphError, Node, NodeContext, NodeOutput};
use crate::graph::state::{AgentPhase, AgentState};
use crate::llm::ChatRequest;

pub struct GenerateNode;

impl GenerateNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenerateNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for GenerateNode {
    fn id(&self) -> &'static str {
        GENERATE
    }

    async fn execute(
        &self,
        state: &mut AgentState,
        ctx: &mut NodeContext<'_>,
    ) -> Result<NodeOutput, GraphError> {
        let request = ChatRequest::new(state.messages.clone())
            .with_tools(ctx.tools.definitions())
            .with_config(ctx.llm_config);

        let reply = ctx
            .llm
            .chat(request)
            .await
            .map_err(|e| GraphError::from_api(self.id(), e))?;

        state.generate_steps += 1;
        let wants_tools = !reply.tool_calls().is_empty();
        if wants_tools {
            tracing::debug!(
                "Model requested {} tool call(s) on turn {}",
                reply.tool_calls().len(),
                state.generate_steps
            );
        }
        state.messages.push(reply);

        if wants_tools {
            state.phase = AgentPhase::CallTool;
            Ok(NodeOutput::Branch(TOOL_CALL.to_string()))
        } else {
            state.phase = AgentPhase::Done;
            Ok(NodeOutput::Final)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LlmConfig;
    use crate::core::errors::ApiError;
    use crate::llm::{ChatMessage, LlmProvider, ToolCall};
    use crate::tools::ToolRegistry;
    use serde_json::json;

    struct Reply(ChatMessage);

    #[async_trait]
    impl LlmProvider for Reply {
        fn name(&self) -> &str {
            "reply"
        }
        async fn health_check(&self) -> Result<bool, ApiError> {
            Ok(true)
        }
        async fn chat(&self, _request: ChatRequest) -> Result<ChatMessage, ApiError> {
            Ok(self.0.clone())
        }
    }

    async fn generate_once(reply: ChatMessage) -> (AgentState, NodeOutput) {
        let llm = Reply(reply);
        let tools = ToolRegistry::new();
        let config = LlmConfig::default();
        let mut ctx = NodeContext {
            llm: &llm,
            tools: &tools,
            llm_config: &config,
        };
        let mut state = AgentState::new("test", None, "hi");
        let output = GenerateNode::new()
            .execute(&mut state, &mut ctx)
            .await
            .unwrap();
        (state, output)
    }

    #[tokio::test]
    async fn tool_request_moves_to_call_tool() {
        let call = ToolCall {
            id: "call_1".into(),
            name: "retrieve_blog_posts".into(),
            arguments: json!({"query": "refund"}),
        };
        let (state, output) =
            generate_once(ChatMessage::assistant_with_tools("", vec![call])).await;

        assert_eq!(state.phase, AgentPhase::CallTool);
        assert!(matches!(output, NodeOutput::Branch(ref c) if c == TOOL_CALL));
        assert_eq!(state.generate_steps, 1);
    }

    #[tokio::test]
    async fn plain_answer_finishes() {
        let (state, output) = generate_once(ChatMessage::assistant("Hello!")).await;

        assert_eq!(state.phase, AgentPhase::Done);
        assert!(matches!(output, NodeOutput::Final));
        assert_eq!(state.answer(), "Hello!");
    }
}
