// Graph Builder
// Constructs the retrieval agent graph using petgraph

use super::node::GraphError;
use super::nodes::{CallToolNode, GenerateNode, CALL_TOOL, GENERATE, TOOL_CALL};
use super::runtime::{GraphBuilder, GraphRuntime};

/// Build the generate / call_tool loop.
///
/// `generate` ends the run when the model answers without tool calls and
/// branches to `call_tool` otherwise; `call_tool` always returns to
/// `generate`.
pub fn build_rag_graph(max_steps: usize) -> Result<GraphRuntime, GraphError> {
    GraphBuilder::new()
        .entry(GENERATE)
        .max_steps(max_steps)
        .node(Box::new(GenerateNode::new()))
        .node(Box::new(CallToolNode::new()))
        .conditional_edge(GENERATE, CALL_TOOL, TOOL_CALL)
        .edge(CALL_TOOL, GENERATE)
        .build()
}
