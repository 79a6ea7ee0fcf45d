//! Node execution error types.
//!
//! Returned by [`Node::run`](crate::graph::Node::run) and by routers. The engine wraps
//! them into [`RunError`](crate::graph::RunError) together with the failing node's name.

use thiserror::Error;

use crate::capability::CapabilityError;
use crate::channels::SchemaError;

/// Error raised by a node function or a decision function.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Execution failed with a message.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The node built a patch that could not be encoded.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A capability the node depends on (retriever, grader, classifier) failed.
    #[error("capability failed: {0}")]
    Capability(#[from] CapabilityError),

    /// The language model call failed.
    #[error("llm call failed: {0}")]
    Llm(String),
}
