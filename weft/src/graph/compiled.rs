//! Compiled state graph: immutable, supports invoke only.
//!
//! Built by `StateGraph::compile`. Holds the nodes, one outgoing definition per node,
//! the entry point and the state schema used to merge patches.

use std::collections::HashMap;
use std::sync::Arc;

use crate::channels::StateSchema;
use crate::state::GraphState;

use super::conditional::{ConditionalEdge, Edge, EntryPoint};
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_route, log_state_update,
};
use super::node::Node;
use super::route::{NodeKey, Route, START};
use super::run_config::RunConfig;
use super::run_error::RunError;

/// Compiled graph: validated structure, ready to run any number of times.
///
/// Runs are independent: each `invoke` owns its state, so one compiled graph can be
/// shared across tasks (`Clone` is cheap; nodes are behind `Arc`).
pub struct CompiledStateGraph<S, N> {
    nodes: HashMap<N, Arc<dyn Node<S>>>,
    node_order: Vec<N>,
    entry: EntryPoint<S, N>,
    edges: HashMap<N, Edge<S, N>>,
    schema: StateSchema,
    max_steps: usize,
}

impl<S, N: Clone> Clone for CompiledStateGraph<S, N> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            node_order: self.node_order.clone(),
            entry: self.entry.clone(),
            edges: self.edges.clone(),
            schema: self.schema.clone(),
            max_steps: self.max_steps,
        }
    }
}

impl<S, N> CompiledStateGraph<S, N>
where
    S: GraphState,
    N: NodeKey,
{
    pub(super) fn new(
        nodes: HashMap<N, Arc<dyn Node<S>>>,
        node_order: Vec<N>,
        entry: EntryPoint<S, N>,
        edges: HashMap<N, Edge<S, N>>,
        schema: StateSchema,
        max_steps: usize,
    ) -> Self {
        Self {
            nodes,
            node_order,
            entry,
            edges,
            schema,
            max_steps,
        }
    }

    /// Default step cap for runs that do not override it.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn schema(&self) -> &StateSchema {
        &self.schema
    }

    /// Node keys in registration order.
    pub fn node_keys(&self) -> &[N] {
        &self.node_order
    }

    pub fn entry(&self) -> &EntryPoint<S, N> {
        &self.entry
    }

    /// Outgoing definition of `node`.
    pub fn edge(&self, node: &N) -> Option<&Edge<S, N>> {
        self.edges.get(node)
    }

    /// Runs a conditional edge and checks the result against its declared targets.
    async fn decide(
        &self,
        from: &str,
        edge: &ConditionalEdge<S, N>,
        state: &S,
    ) -> Result<Route<N>, RunError<S>> {
        let route = edge.resolve(state).await.map_err(|source| RunError::Router {
            node: from.to_string(),
            source,
        })?;
        log_route(from, route.name());
        if !edge.allows(&route) {
            return Err(RunError::UnexpectedRoute {
                from: from.to_string(),
                to: route.name().to_string(),
            });
        }
        Ok(route)
    }

    async fn first_node(&self, state: &S) -> Result<N, RunError<S>> {
        match &self.entry {
            EntryPoint::Node(n) => Ok(n.clone()),
            EntryPoint::Conditional(edge) => match self.decide(START, edge, state).await? {
                Route::Node(n) => Ok(n),
                Route::End => Err(RunError::UnexpectedRoute {
                    from: START.to_string(),
                    to: Route::<N>::End.name().to_string(),
                }),
            },
        }
    }

    async fn run_loop(&self, state: S, config: &RunConfig) -> Result<S, RunError<S>> {
        let max_steps = config.max_steps.unwrap_or(self.max_steps);
        let mut state = state;
        let mut current = self.first_node(&state).await?;
        log_graph_start(current.name(), max_steps);

        let mut step = 0usize;
        let mut previous = START.to_string();
        loop {
            if config.is_cancelled() {
                return Err(RunError::Cancelled {
                    node: current.name().to_string(),
                    state,
                });
            }

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| RunError::UnexpectedRoute {
                    from: previous.clone(),
                    to: current.name().to_string(),
                })?;

            log_node_start(current.name(), step);
            let patch = node.run(&state).await.map_err(|source| RunError::Node {
                node: current.name().to_string(),
                source,
            })?;
            log_node_complete(current.name(), &patch.fields().collect::<Vec<_>>());

            state = self
                .schema
                .merge(&state, patch)
                .map_err(|source| RunError::Schema {
                    node: current.name().to_string(),
                    source,
                })?;
            log_state_update(current.name());

            let next = match self.edges.get(&current) {
                Some(Edge::Fixed(route)) => route.clone(),
                Some(Edge::Conditional(edge)) => self.decide(current.name(), edge, &state).await?,
                None => return Err(RunError::MissingEdge(current.name().to_string())),
            };

            match next {
                Route::End => {
                    log_graph_complete(step + 1);
                    return Ok(state);
                }
                Route::Node(n) => {
                    step += 1;
                    if step > max_steps {
                        return Err(RunError::StepLimitExceeded { max_steps, state });
                    }
                    previous = current.name().to_string();
                    current = n;
                }
            }
        }
    }

    /// Runs the graph from its entry point until a route reaches `Route::End`.
    ///
    /// Each iteration: check cancellation, run the current node, merge its patch through
    /// the schema, pick the next route. Every transition to another node counts as a step;
    /// the run fails with `StepLimitExceeded` once the count exceeds the cap (from
    /// `config.max_steps`, else the graph default).
    pub async fn invoke(&self, state: S, config: Option<RunConfig>) -> Result<S, RunError<S>> {
        let config = config.unwrap_or_default();
        let result = self.run_loop(state, &config).await;
        if let Err(ref e) = result {
            log_graph_error(e);
        }
        result
    }
}
