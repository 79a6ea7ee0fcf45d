//! Shared types for StateGraph integration tests: CycleState and node helpers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use weft::{GraphState, Node, NodeError, Patch, Route, StateGraph, StateSchema};

/// Counter (replace) plus a visit log (append).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleState {
    pub counter: i64,
    pub log: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl GraphState for CycleState {
    fn schema() -> StateSchema {
        StateSchema::new()
            .replace("counter")
            .append("log")
            .replace("note")
    }
}

/// Increments the counter and logs its own name.
pub struct Visit(pub &'static str);

#[async_trait]
impl Node<CycleState> for Visit {
    async fn run(&self, state: &CycleState) -> Result<Patch, NodeError> {
        Ok(Patch::new()
            .set("counter", &(state.counter + 1))?
            .append("log", [self.0])?)
    }
}

/// Always fails.
pub struct Failing;

#[async_trait]
impl Node<CycleState> for Failing {
    async fn run(&self, _state: &CycleState) -> Result<Patch, NodeError> {
        Err(NodeError::ExecutionFailed("boom".to_string()))
    }
}

/// Routes to `next` until the counter reaches `stop_at`; never ends when `stop_at` is None.
pub fn stop_at(stop_at: Option<i64>, next: &'static str) -> impl Fn(&CycleState) -> Route<&'static str> {
    move |s: &CycleState| match stop_at {
        Some(n) if s.counter >= n => Route::End,
        _ => Route::Node(next),
    }
}

/// Two-node cycle a ⇄ b; after each node the run ends once the counter reaches `stop`.
pub fn two_node_cycle(stop: Option<i64>) -> StateGraph<CycleState, &'static str> {
    let mut graph = StateGraph::new();
    graph
        .add_node("a", Arc::new(Visit("a")))
        .add_node("b", Arc::new(Visit("b")))
        .set_entry_point("a")
        .add_conditional_edges("a", stop_at(stop, "b"), [Route::Node("b"), Route::End])
        .add_conditional_edges("b", stop_at(stop, "a"), [Route::Node("a"), Route::End]);
    graph
}
