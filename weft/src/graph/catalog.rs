//! Named registry of compiled graphs sharing one state type.
//!
//! The run invocation surface: `run(graph_id, initial_state, config)` either returns
//! the final state or a `RunError`, whose `report()` gives the `{error, detail}` shape.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::state::GraphState;

use super::route::NodeKey;
use super::run_config::RunConfig;
use super::run_error::RunError;
use super::CompiledStateGraph;

/// A graph that can be run on state `S`, with its node key type erased.
#[async_trait]
pub trait RunnableGraph<S>: Send + Sync {
    async fn run(&self, state: S, config: Option<RunConfig>) -> Result<S, RunError<S>>;
}

#[async_trait]
impl<S, N> RunnableGraph<S> for CompiledStateGraph<S, N>
where
    S: GraphState,
    N: NodeKey,
{
    async fn run(&self, state: S, config: Option<RunConfig>) -> Result<S, RunError<S>> {
        self.invoke(state, config).await
    }
}

/// Graphs by id.
pub struct GraphCatalog<S> {
    graphs: BTreeMap<String, Arc<dyn RunnableGraph<S>>>,
}

impl<S> Default for GraphCatalog<S> {
    fn default() -> Self {
        Self {
            graphs: BTreeMap::new(),
        }
    }
}

impl<S> Clone for GraphCatalog<S> {
    fn clone(&self) -> Self {
        Self {
            graphs: self.graphs.clone(),
        }
    }
}

impl<S> GraphCatalog<S>
where
    S: GraphState,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `graph` under `id`, replacing any previous graph with that id.
    pub fn register<N: NodeKey>(
        &mut self,
        id: impl Into<String>,
        graph: CompiledStateGraph<S, N>,
    ) -> &mut Self {
        self.graphs.insert(id.into(), Arc::new(graph));
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.graphs.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        self.graphs.keys().map(String::as_str).collect()
    }

    /// Runs the graph registered as `graph_id`.
    pub async fn run(
        &self,
        graph_id: &str,
        state: S,
        config: Option<RunConfig>,
    ) -> Result<S, RunError<S>> {
        let graph = self
            .graphs
            .get(graph_id)
            .ok_or_else(|| RunError::UnknownGraph(graph_id.to_string()))?;
        tracing::debug!(graph_id = graph_id, "Running graph from catalog");
        graph.run(state, config).await
    }
}
