pub mod agent;
pub mod core;
pub mod documents;
pub mod graph;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
pub mod tools;
pub mod vector_math;
