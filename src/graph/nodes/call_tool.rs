// Call Tool Node
// Executes the tool calls of the latest assistant message

use async_trait::async_trait;

use super::CALL_TOOL;
use crate::graph::node::{GraphError, Node, NodeContext, NodeOutput};
use crate::graph::state::{AgentPhase, AgentState};
use crate::llm::{ChatMessage, ToolCall};

pub struct CallToolNode;

impl CallToolNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CallToolNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for CallToolNode {
    fn id(&self) -> &'static str {
        CALL_TOOL
    }

    async fn execute(
        &self,
        state: &mut AgentState,
        ctx: &mut NodeContext<'_>,
    ) -> Result<NodeOutput, GraphError> {
        if state.phase != AgentPhase::CallTool {
            return Err(GraphError::routing(
                self.id(),
                format!("Cannot call tools in phase `{}`", state.phase.as_str()),
            ));
        }

        let calls: Vec<ToolCall> = match state.messages.last() {
            Some(message @ ChatMessage::Assistant { .. }) => message.tool_calls().to_vec(),
            _ => Vec::new(),
        };
        if calls.is_empty() {
            return Err(GraphError::new(
                self.id(),
                "Last message is not an assistant message with tool calls",
            ));
        }

        for call in calls {
            tracing::info!("Executing tool `{}` ({})", call.name, call.id);
            let output = ctx
                .tools
                .execute(&call.name, &call.arguments)
                .await
                .map_err(|e| {
                    GraphError::from_api(self.id(), e)
                        .with_message_prefix(&format!("Tool `{}` failed", call.name))
                })?;
            state
                .messages
                .push(ChatMessage::tool(call.id, call.name, output));
            state.tool_steps += 1;
        }

        state.phase = AgentPhase::Generate;
        Ok(NodeOutput::Continue)
    }
}
