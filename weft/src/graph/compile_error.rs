//! Graph compilation error (the graph-configuration error class).
//!
//! Returned by `StateGraph::compile` when the definition is incomplete or inconsistent.
//! Every problem that can be found from the definition alone is reported here, never
//! mid-run.

use thiserror::Error;

use crate::channels::SchemaError;

/// Error when compiling a state graph.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// No entry point was set.
    #[error("graph has no entry point")]
    MissingEntry,

    /// An entry point or edge source names a node that was never added.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// A registered node has no outgoing edge.
    #[error("node has no outgoing edge: {0}")]
    MissingEdge(String),

    /// A node has more than one outgoing edge definition.
    #[error("node has more than one outgoing edge: {0}")]
    DuplicateEdge(String),

    /// A node has both a fixed edge and conditional edges; it must have exactly one.
    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// An edge (fixed or declared conditional target) points at an unknown node,
    /// or a conditional entry point lists the terminal marker.
    #[error("invalid edge target: {from} -> {to}")]
    InvalidEdgeTarget { from: String, to: String },

    /// Conditional edges declared no possible targets.
    #[error("conditional edges from {0} declare no targets")]
    EmptyRouteTargets(String),

    /// The state schema itself is malformed.
    #[error("invalid state schema: {0}")]
    InvalidSchema(#[from] SchemaError),
}
