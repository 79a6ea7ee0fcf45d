//! State graph builder: nodes, an entry point, and one outgoing edge definition per node.
//!
//! Add nodes with `add_node`, pick the first node with `set_entry_point` (or route the
//! initial state with `set_conditional_entry_point`), then give every node exactly one
//! outgoing definition: `add_edge(from, to)` for a fixed successor or
//! `add_conditional_edges`/`add_router` for a state-based decision. `compile` validates
//! the whole definition and returns a [`CompiledStateGraph`].
//!
//! # Conditional edges
//!
//! A routing function `(state) -> Route<N>` is called after the source node's patch is
//! merged. Its possible targets are declared up front; returning anything else at run
//! time fails the run with `RunError::UnexpectedRoute`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::channels::Patch;
use crate::error::NodeError;
use crate::state::GraphState;

use super::compile_error::CompilationError;
use super::compiled::CompiledStateGraph;
use super::conditional::{ConditionalEdge, Edge, EntryPoint, FnRouter, Router};
use super::node::{FnNode, Node};
use super::route::{NodeKey, Route, END, START};

/// Step cap used when neither the graph nor the run overrides it.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Graph definition under construction.
///
/// Generic over the state type `S` and the node key type `N`.
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>` and routers; produces
/// `CompiledStateGraph<S, N>`.
pub struct StateGraph<S, N> {
    nodes: HashMap<N, Arc<dyn Node<S>>>,
    /// Registration order, for deterministic validation and visualization.
    node_order: Vec<N>,
    entry: Option<EntryPoint<S, N>>,
    /// Outgoing definitions in the order they were added; duplicates are a compile error.
    edges: Vec<(N, Edge<S, N>)>,
    max_steps: usize,
}

impl<S, N> Default for StateGraph<S, N>
where
    S: GraphState,
    N: NodeKey,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N> StateGraph<S, N>
where
    S: GraphState,
    N: NodeKey,
{
    /// Creates an empty graph with the default step cap.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            node_order: Vec::new(),
            entry: None,
            edges: Vec::new(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Sets the default step cap for runs of the compiled graph.
    pub fn with_max_steps(self, max_steps: usize) -> Self {
        Self { max_steps, ..self }
    }

    /// Adds a node. Replaces the function if the key was already registered.
    pub fn add_node(&mut self, key: N, node: Arc<dyn Node<S>>) -> &mut Self {
        if self.nodes.insert(key.clone(), node).is_none() {
            self.node_order.push(key);
        }
        self
    }

    /// Adds a node backed by a synchronous closure.
    pub fn add_fn_node<F>(&mut self, key: N, f: F) -> &mut Self
    where
        F: Fn(&S) -> Result<Patch, NodeError> + Send + Sync + 'static,
    {
        self.add_node(key, Arc::new(FnNode::new(f)))
    }

    pub fn set_entry_point(&mut self, key: N) -> &mut Self {
        self.entry = Some(EntryPoint::Node(key));
        self
    }

    /// Routes the initial state to the first node. `targets` must all be nodes.
    pub fn set_conditional_entry_point(
        &mut self,
        router: Arc<dyn Router<S, N>>,
        targets: impl IntoIterator<Item = N>,
    ) -> &mut Self {
        let targets = targets.into_iter().map(Route::Node).collect();
        self.entry = Some(EntryPoint::Conditional(ConditionalEdge::new(router, targets)));
        self
    }

    /// Adds a fixed edge from `from` to a node or to `Route::End`.
    pub fn add_edge(&mut self, from: N, to: impl Into<Route<N>>) -> &mut Self {
        self.edges.push((from, Edge::Fixed(to.into())));
        self
    }

    /// Adds conditional edges from `from`: `path(state)` picks one of `targets`.
    pub fn add_conditional_edges<F>(
        &mut self,
        from: N,
        path: F,
        targets: impl IntoIterator<Item = Route<N>>,
    ) -> &mut Self
    where
        F: Fn(&S) -> Route<N> + Send + Sync + 'static,
    {
        self.add_router(from, Arc::new(FnRouter::new(path)), targets)
    }

    /// Adds conditional edges from `from` driven by an async [`Router`].
    pub fn add_router(
        &mut self,
        from: N,
        router: Arc<dyn Router<S, N>>,
        targets: impl IntoIterator<Item = Route<N>>,
    ) -> &mut Self {
        let edge = ConditionalEdge::new(router, targets.into_iter().collect());
        self.edges.push((from, Edge::Conditional(edge)));
        self
    }

    fn check_target(&self, from: &str, to: &Route<N>) -> Result<(), CompilationError> {
        match to {
            Route::End => Ok(()),
            Route::Node(n) if self.nodes.contains_key(n) => Ok(()),
            Route::Node(n) => Err(CompilationError::InvalidEdgeTarget {
                from: from.to_string(),
                to: n.name().to_string(),
            }),
        }
    }

    /// Validates the definition and builds the executable graph.
    ///
    /// Checks, in order: the state schema, the entry point, every outgoing definition
    /// (source exists, at most one per node, targets exist, conditional target sets are
    /// non-empty), and that every node has an outgoing definition.
    pub fn compile(self) -> Result<CompiledStateGraph<S, N>, CompilationError> {
        let schema = S::schema();
        schema.validate()?;

        let entry = self.entry.as_ref().ok_or(CompilationError::MissingEntry)?;
        match entry {
            EntryPoint::Node(n) => {
                if !self.nodes.contains_key(n) {
                    return Err(CompilationError::NodeNotFound(n.name().to_string()));
                }
            }
            EntryPoint::Conditional(edge) => {
                if edge.targets().is_empty() {
                    return Err(CompilationError::EmptyRouteTargets(START.to_string()));
                }
                for target in edge.targets() {
                    if target.is_end() {
                        return Err(CompilationError::InvalidEdgeTarget {
                            from: START.to_string(),
                            to: END.to_string(),
                        });
                    }
                    self.check_target(START, target)?;
                }
            }
        }

        let mut outgoing: HashMap<N, Edge<S, N>> = HashMap::new();
        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.name().to_string()));
            }
            if let Some(existing) = outgoing.get(from) {
                let mixed = matches!(
                    (existing, edge),
                    (Edge::Fixed(_), Edge::Conditional(_)) | (Edge::Conditional(_), Edge::Fixed(_))
                );
                return Err(if mixed {
                    CompilationError::NodeHasBothEdgeAndConditional(from.name().to_string())
                } else {
                    CompilationError::DuplicateEdge(from.name().to_string())
                });
            }
            match edge {
                Edge::Fixed(to) => self.check_target(from.name(), to)?,
                Edge::Conditional(c) => {
                    if c.targets().is_empty() {
                        return Err(CompilationError::EmptyRouteTargets(from.name().to_string()));
                    }
                    for to in c.targets() {
                        self.check_target(from.name(), to)?;
                    }
                }
            }
            outgoing.insert(from.clone(), edge.clone());
        }

        if let Some(orphan) = self.node_order.iter().find(|n| !outgoing.contains_key(*n)) {
            return Err(CompilationError::MissingEdge(orphan.name().to_string()));
        }

        let Self {
            nodes,
            node_order,
            entry,
            max_steps,
            ..
        } = self;
        let entry = entry.ok_or(CompilationError::MissingEntry)?;
        Ok(CompiledStateGraph::new(
            nodes, node_order, entry, outgoing, schema, max_steps,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::StateSchema;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Counter {
        count: i64,
    }

    impl GraphState for Counter {
        fn schema() -> StateSchema {
            StateSchema::new().replace("count")
        }
    }

    fn noop(_: &Counter) -> Result<Patch, NodeError> {
        Ok(Patch::new())
    }

    /// **Scenario**: A graph without an entry point fails to compile with MissingEntry.
    #[test]
    fn compile_fails_without_entry() {
        let mut g = StateGraph::<Counter, &'static str>::new();
        g.add_fn_node("a", noop).add_edge("a", Route::End);
        assert!(matches!(g.compile(), Err(CompilationError::MissingEntry)));
    }

    /// **Scenario**: The entry point must name a registered node.
    #[test]
    fn compile_fails_on_unknown_entry() {
        let mut g = StateGraph::<Counter, &'static str>::new();
        g.add_fn_node("a", noop)
            .add_edge("a", Route::End)
            .set_entry_point("ghost");
        match g.compile() {
            Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "ghost"),
            other => panic!("expected NodeNotFound, got {:?}", other.err()),
        }
    }

    /// **Scenario**: A declared conditional target that is not a node is rejected.
    #[test]
    fn compile_fails_on_unknown_conditional_target() {
        let mut g = StateGraph::<Counter, &'static str>::new();
        g.add_fn_node("a", noop)
            .set_entry_point("a")
            .add_conditional_edges("a", |_| Route::End, [Route::Node("b"), Route::End]);
        match g.compile() {
            Err(CompilationError::InvalidEdgeTarget { from, to }) => {
                assert_eq!(from, "a");
                assert_eq!(to, "b");
            }
            other => panic!("expected InvalidEdgeTarget, got {:?}", other.err()),
        }
    }

    /// **Scenario**: Mixing a fixed edge and conditional edges on one node is rejected.
    #[test]
    fn compile_fails_on_edge_and_conditional() {
        let mut g = StateGraph::<Counter, &'static str>::new();
        g.add_fn_node("a", noop)
            .set_entry_point("a")
            .add_edge("a", Route::End)
            .add_conditional_edges("a", |_| Route::End, [Route::End]);
        assert!(matches!(
            g.compile(),
            Err(CompilationError::NodeHasBothEdgeAndConditional(_))
        ));
    }

    /// **Scenario**: Two fixed edges from the same node are rejected.
    #[test]
    fn compile_fails_on_duplicate_edge() {
        let mut g = StateGraph::<Counter, &'static str>::new();
        g.add_fn_node("a", noop)
            .add_fn_node("b", noop)
            .set_entry_point("a")
            .add_edge("a", "b")
            .add_edge("a", Route::End)
            .add_edge("b", Route::End);
        assert!(matches!(g.compile(), Err(CompilationError::DuplicateEdge(_))));
    }

    /// **Scenario**: Every node needs an outgoing edge.
    #[test]
    fn compile_fails_on_node_without_edge() {
        let mut g = StateGraph::<Counter, &'static str>::new();
        g.add_fn_node("a", noop)
            .add_fn_node("b", noop)
            .set_entry_point("a")
            .add_edge("a", Route::End);
        match g.compile() {
            Err(CompilationError::MissingEdge(id)) => assert_eq!(id, "b"),
            other => panic!("expected MissingEdge, got {:?}", other.err()),
        }
    }

    /// **Scenario**: A conditional entry point may not list End or be empty.
    #[test]
    fn compile_checks_conditional_entry() {
        let mut g = StateGraph::<Counter, &'static str>::new();
        g.add_fn_node("a", noop)
            .add_edge("a", Route::End)
            .set_conditional_entry_point(Arc::new(FnRouter::new(|_: &Counter| Route::Node("a"))), []);
        assert!(matches!(
            g.compile(),
            Err(CompilationError::EmptyRouteTargets(_))
        ));
    }

    /// **Scenario**: A well-formed graph compiles and keeps the configured step cap.
    #[test]
    fn compile_ok_keeps_max_steps() {
        let mut g = StateGraph::<Counter, &'static str>::new().with_max_steps(3);
        g.add_fn_node("a", noop)
            .set_entry_point("a")
            .add_edge("a", Route::End);
        let compiled = g.compile().expect("compiles");
        assert_eq!(compiled.max_steps(), 3);
    }
}
