//! State graph: nodes, fixed and conditional edges, compile and invoke.
//!
//! `StateGraph`: add nodes and edges, compile, then invoke the `CompiledStateGraph`
//! with an initial state. Runs loop until a route reaches `Route::End` or the step
//! cap is exceeded.

mod catalog;
mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod node;
mod route;
mod run_config;
mod run_error;
mod state_graph;
mod visualization;

pub use catalog::{GraphCatalog, RunnableGraph};
pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use conditional::{ConditionalEdge, Edge, EntryPoint, FnRouter, Router};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_route, log_state_update,
};
pub use node::{FnNode, Node};
pub use route::{NodeKey, Route, END, START};
pub use run_config::RunConfig;
pub use run_error::{ErrorKind, ErrorReport, RunError};
pub use state_graph::{StateGraph, DEFAULT_MAX_STEPS};
pub use visualization::{generate_mermaid, generate_text};
