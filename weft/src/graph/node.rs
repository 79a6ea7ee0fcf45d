//! Graph node trait: one step in a StateGraph.
//!
//! Receives the current state by reference and returns a partial update ([`Patch`]).
//! Nodes never mutate the input state; the engine merges the patch.

use async_trait::async_trait;

use crate::channels::Patch;
use crate::error::NodeError;
use crate::state::GraphState;

/// One step in a graph: state in, patch out.
///
/// Implementations may call external capabilities (LLM, search); the engine waits for
/// the returned future before doing anything else in the run.
///
/// **Interaction**: Registered with `StateGraph::add_node`; invoked by
/// `CompiledStateGraph::invoke`.
#[async_trait]
pub trait Node<S>: Send + Sync {
    async fn run(&self, state: &S) -> Result<Patch, NodeError>;
}

/// Node backed by a synchronous closure `Fn(&S) -> Result<Patch, NodeError>`.
pub struct FnNode<F> {
    f: F,
}

impl<F> FnNode<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<S, F> Node<S> for FnNode<F>
where
    S: GraphState,
    F: Fn(&S) -> Result<Patch, NodeError> + Send + Sync,
{
    async fn run(&self, state: &S) -> Result<Patch, NodeError> {
        (self.f)(state)
    }
}
