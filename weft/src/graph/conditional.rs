//! Conditional edges: route to the next node based on state.
//!
//! A source node with conditional edges has a [`Router`] that inspects the state after
//! the node's patch is merged and returns a [`Route`]. The router declares its possible
//! targets up front so the graph can be validated when it is compiled.
//!
//! **Interaction**: Used by `StateGraph::add_conditional_edges`/`add_router` and by the
//! `CompiledStateGraph` run loop.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::state::GraphState;

use super::route::{NodeKey, Route};

/// Decision function: state in, next route out.
///
/// Must not mutate shared state; it may consult read-only external classifiers,
/// which is why it is async.
#[async_trait]
pub trait Router<S, N>: Send + Sync {
    async fn route(&self, state: &S) -> Result<Route<N>, NodeError>;
}

/// Router backed by a synchronous closure `Fn(&S) -> Route<N>`.
pub struct FnRouter<F> {
    f: F,
}

impl<F> FnRouter<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<S, N, F> Router<S, N> for FnRouter<F>
where
    S: GraphState,
    N: NodeKey,
    F: Fn(&S) -> Route<N> + Send + Sync,
{
    async fn route(&self, state: &S) -> Result<Route<N>, NodeError> {
        Ok((self.f)(state))
    }
}

/// Router plus the set of targets it may return.
pub struct ConditionalEdge<S, N> {
    router: Arc<dyn Router<S, N>>,
    targets: Vec<Route<N>>,
}

impl<S, N: Clone> Clone for ConditionalEdge<S, N> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
            targets: self.targets.clone(),
        }
    }
}

impl<S, N> ConditionalEdge<S, N>
where
    S: GraphState,
    N: NodeKey,
{
    pub fn new(router: Arc<dyn Router<S, N>>, targets: Vec<Route<N>>) -> Self {
        Self { router, targets }
    }

    /// Targets declared when the edge was added.
    pub fn targets(&self) -> &[Route<N>] {
        &self.targets
    }

    pub fn allows(&self, route: &Route<N>) -> bool {
        self.targets.contains(route)
    }

    pub(crate) async fn resolve(&self, state: &S) -> Result<Route<N>, NodeError> {
        self.router.route(state).await
    }
}

/// How to determine the next node after a given node runs.
pub enum Edge<S, N> {
    /// Single fixed successor (or End).
    Fixed(Route<N>),
    /// Successor decided from state at run time.
    Conditional(ConditionalEdge<S, N>),
}

impl<S, N: Clone> Clone for Edge<S, N> {
    fn clone(&self) -> Self {
        match self {
            Edge::Fixed(r) => Edge::Fixed(r.clone()),
            Edge::Conditional(c) => Edge::Conditional(c.clone()),
        }
    }
}

/// Where a run starts: a fixed node or a router evaluated on the initial state.
pub enum EntryPoint<S, N> {
    Node(N),
    Conditional(ConditionalEdge<S, N>),
}

impl<S, N: Clone> Clone for EntryPoint<S, N> {
    fn clone(&self) -> Self {
        match self {
            EntryPoint::Node(n) => EntryPoint::Node(n.clone()),
            EntryPoint::Conditional(c) => EntryPoint::Conditional(c.clone()),
        }
    }
}
