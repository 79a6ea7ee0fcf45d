//! Run failures and their serializable report.
//!
//! Structural problems (schema, routing outside the declared targets) and the step cap
//! always propagate to the caller. Capability failures inside the tool node never get
//! here; they are recorded in state as tool-result messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capability::CapabilityError;
use crate::channels::SchemaError;
use crate::error::NodeError;

use super::compile_error::CompilationError;

/// Why a run did not reach the terminal marker.
#[derive(Debug, Error)]
pub enum RunError<S> {
    /// A node's patch could not be merged (undeclared field, wrong type).
    #[error("node {node} produced an invalid patch: {source}")]
    Schema { node: String, source: SchemaError },

    /// A node function failed.
    #[error("node {node} failed: {source}")]
    Node { node: String, source: NodeError },

    /// A decision function failed.
    #[error("router after {node} failed: {source}")]
    Router { node: String, source: NodeError },

    /// A router returned a target outside the set it declared.
    #[error("router after {from} returned undeclared target {to}")]
    UnexpectedRoute { from: String, to: String },

    /// The current node has no outgoing definition; the run cannot continue.
    #[error("node {0} has no outgoing edge")]
    MissingEdge(String),

    /// The run took more transitions than allowed; carries the state reached so far.
    #[error("step limit of {max_steps} exceeded")]
    StepLimitExceeded { max_steps: usize, state: S },

    /// The run was cancelled before `node` started; carries the state reached so far.
    #[error("run cancelled before node {node}")]
    Cancelled { node: String, state: S },

    /// No graph is registered under this id.
    #[error("unknown graph: {0}")]
    UnknownGraph(String),
}

/// Error class of a failed run, as reported to callers and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    SchemaError,
    GraphConfigError,
    StepLimitExceeded,
    CapabilityFailure,
    NodeFailed,
    Cancelled,
}

/// `{error: kind, detail}` shape returned by a failed run invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: ErrorKind,
    pub detail: String,
}

fn node_error_kind(err: &NodeError) -> ErrorKind {
    match err {
        NodeError::Schema(_) => ErrorKind::SchemaError,
        NodeError::Capability(_) => ErrorKind::CapabilityFailure,
        NodeError::ExecutionFailed(_) | NodeError::Llm(_) => ErrorKind::NodeFailed,
    }
}

impl<S> RunError<S> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::Schema { .. } => ErrorKind::SchemaError,
            RunError::Node { source, .. } | RunError::Router { source, .. } => {
                node_error_kind(source)
            }
            RunError::UnexpectedRoute { .. }
            | RunError::MissingEdge(_)
            | RunError::UnknownGraph(_) => {
                ErrorKind::GraphConfigError
            }
            RunError::StepLimitExceeded { .. } => ErrorKind::StepLimitExceeded,
            RunError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Partial state carried by the error (step limit and cancellation only).
    pub fn partial_state(&self) -> Option<&S> {
        match self {
            RunError::StepLimitExceeded { state, .. } | RunError::Cancelled { state, .. } => {
                Some(state)
            }
            _ => None,
        }
    }

    /// Capability failure behind a node or router error, if that is the cause.
    pub fn capability_error(&self) -> Option<&CapabilityError> {
        match self {
            RunError::Node {
                source: NodeError::Capability(e),
                ..
            }
            | RunError::Router {
                source: NodeError::Capability(e),
                ..
            } => Some(e),
            _ => None,
        }
    }
}

impl<S> RunError<S>
where
    S: std::fmt::Debug,
{
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            error: self.kind(),
            detail: self.to_string(),
        }
    }
}

impl From<&CompilationError> for ErrorReport {
    fn from(err: &CompilationError) -> Self {
        ErrorReport {
            error: ErrorKind::GraphConfigError,
            detail: err.to_string(),
        }
    }
}
