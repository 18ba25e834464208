// Graph Module
// StateGraph runtime driving the retrieval agent loop

pub mod builder;
pub mod node;
pub mod runtime;
pub mod state;

pub mod nodes;

pub use builder::build_rag_graph;
pub use node::{GraphError, GraphErrorKind, Node, NodeContext, NodeOutput};
pub use runtime::GraphRuntime;
pub use state::{AgentPhase, AgentState};
