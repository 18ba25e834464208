// Graph State
// AgentState carried through the generate / call_tool loop

use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;

/// Where the loop is. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    #[default]
    Generate,
    CallTool,
    Done,
}

impl AgentPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentPhase::Generate => "generate",
            AgentPhase::CallTool => "call_tool",
            AgentPhase::Done => "done",
        }
    }
}

/// Main graph state
#[derive(Debug, Clone)]
pub struct AgentState {
    pub conversation_id: String,
    /// Full history; nodes only ever append.
    pub messages: Vec<ChatMessage>,
    pub phase: AgentPhase,
    pub generate_steps: usize,
    pub tool_steps: usize,
}

impl AgentState {
    pub fn new(
        conversation_id: impl Into<String>,
        system_prompt: Option<&str>,
        query: impl Into<String>,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = system_prompt.filter(|p| !p.trim().is_empty()) {
            messages.push(ChatMessage::system(prompt));
        }
        messages.push(ChatMessage::user(query));
        Self {
            conversation_id: conversation_id.into(),
            messages,
            phase: AgentPhase::Generate,
            generate_steps: 0,
            tool_steps: 0,
        }
    }

    pub fn last_assistant(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| matches!(m, ChatMessage::Assistant { .. }))
    }

    /// Content of the final assistant message; empty when there is none.
    pub fn answer(&self) -> String {
        self.last_assistant()
            .map(|m| m.content().to_string())
            .unwrap_or_default()
    }

    /// Contents of every tool message, in the order they were produced.
    pub fn sources(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| matches!(m, ChatMessage::Tool { .. }))
            .map(|m| m.content().to_string())
            .collect()
    }
}
