// Graph Nodes Module
// Individual node implementations

pub mod call_tool;
pub mod generate;

pub use call_tool::CallToolNode;
pub use generate::GenerateNode;

pub const GENERATE: &str = "generate";
pub const CALL_TOOL: &str = "call_tool";

/// Condition `generate` branches on when the reply requests tools.
pub const TOOL_CALL: &str = "tool_call";
