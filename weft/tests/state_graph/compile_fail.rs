//! StateGraph compile: configuration errors are reported before any run.

use std::sync::Arc;

use weft::{CompilationError, ErrorKind, ErrorReport, Route, StateGraph};

use crate::common::{CycleState, Visit};

/// **Scenario**: A node without an outgoing edge is a configuration error at compile time.
#[test]
fn compile_fails_when_node_has_no_edge() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("a", Arc::new(Visit("a")))
        .add_node("b", Arc::new(Visit("b")))
        .set_entry_point("a")
        .add_edge("a", "b");
    match graph.compile() {
        Err(CompilationError::MissingEdge(id)) => assert_eq!(id, "b"),
        other => panic!("expected MissingEdge, got {:?}", other.err()),
    }
}

/// **Scenario**: An edge to an undefined node is rejected.
#[test]
fn compile_fails_on_edge_to_unknown_node() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("a", Arc::new(Visit("a")))
        .set_entry_point("a")
        .add_edge("a", "ghost");
    let err = graph.compile().err().expect("compile must fail");
    assert!(
        matches!(err, CompilationError::InvalidEdgeTarget { ref to, .. } if to == "ghost"),
        "{err}"
    );
    let report = ErrorReport::from(&err);
    assert_eq!(report.error, ErrorKind::GraphConfigError);
}

/// **Scenario**: An edge from an unregistered node is rejected.
#[test]
fn compile_fails_on_edge_from_unknown_node() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("a", Arc::new(Visit("a")))
        .set_entry_point("a")
        .add_edge("a", Route::End)
        .add_edge("ghost", "a");
    assert!(matches!(
        graph.compile(),
        Err(CompilationError::NodeNotFound(ref id)) if id == "ghost"
    ));
}

/// **Scenario**: Conditional edges with no declared targets are rejected.
#[test]
fn compile_fails_on_empty_conditional_targets() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("a", Arc::new(Visit("a")))
        .set_entry_point("a")
        .add_conditional_edges("a", |_| Route::End, []);
    assert!(matches!(
        graph.compile(),
        Err(CompilationError::EmptyRouteTargets(ref id)) if id == "a"
    ));
}

/// **Scenario**: A graph with no entry point does not compile.
#[test]
fn compile_fails_without_entry_point() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("a", Arc::new(Visit("a")))
        .add_edge("a", Route::End);
    assert!(matches!(graph.compile(), Err(CompilationError::MissingEntry)));
}
