//! StateGraph invoke: results, merge semantics, errors, routing and cancellation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use weft::{
    ErrorKind, FnRouter, GraphState, Node, NodeError, Patch, Route, RunConfig, RunError,
    SchemaError, StateGraph, StateSchema,
};

use crate::common::{stop_at, CycleState, Failing, Visit};

/// **Scenario**: A single node routed unconditionally to End runs exactly once.
#[tokio::test]
async fn invoke_single_node_runs_once() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("a", Arc::new(Visit("a")))
        .set_entry_point("a")
        .add_edge("a", Route::End);
    let compiled = graph.compile().unwrap();

    for initial in [
        CycleState::default(),
        CycleState {
            counter: 41,
            log: vec!["seed".into()],
            note: Some("kept".into()),
        },
    ] {
        let out = compiled.invoke(initial.clone(), None).await.unwrap();
        assert_eq!(out.counter, initial.counter + 1);
        assert_eq!(out.log.len(), initial.log.len() + 1);
        assert_eq!(out.note, initial.note, "untouched fields are preserved");
    }
}

/// **Scenario**: A patch naming an undeclared field fails the run with a schema error.
#[tokio::test]
async fn invoke_undeclared_field_is_schema_error() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_fn_node("bad", |_| Ok(Patch::new().set("colour", "red")?))
        .set_entry_point("bad")
        .add_edge("bad", Route::End);
    let err = graph
        .compile()
        .unwrap()
        .invoke(CycleState::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaError);
    assert!(err.report().detail.contains("colour"), "{}", err);
}

/// Schema declares `notes` while the struct field is `note`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MisspelledState {
    note: Option<String>,
}

impl GraphState for MisspelledState {
    fn schema() -> StateSchema {
        StateSchema::new().replace("notes")
    }
}

/// **Scenario**: A declared field the state type lacks fails the run instead of dropping the write.
#[tokio::test]
async fn invoke_declared_field_missing_from_state_is_schema_error() {
    let mut graph = StateGraph::<MisspelledState, &'static str>::new();
    graph
        .add_fn_node("write", |_| Ok(Patch::new().set("notes", "kept")?))
        .set_entry_point("write")
        .add_edge("write", Route::End);
    let err = graph
        .compile()
        .unwrap()
        .invoke(MisspelledState::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaError);
    match err {
        RunError::Schema { node, source } => {
            assert_eq!(node, "write");
            assert_eq!(source, SchemaError::NotInState("notes".into()));
        }
        other => panic!("expected Schema error, got {other}"),
    }
}

/// **Scenario**: Appending a non-list to an append field is a schema error.
#[tokio::test]
async fn invoke_append_requires_sequence() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_fn_node("bad", |_| Ok(Patch::new().set_value("log", serde_json::json!("x"))))
        .set_entry_point("bad")
        .add_edge("bad", Route::End);
    let err = graph
        .compile()
        .unwrap()
        .invoke(CycleState::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaError);
}

/// **Scenario**: A failing node stops the run and names the node.
#[tokio::test]
async fn invoke_node_failure_propagates() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("a", Arc::new(Visit("a")))
        .add_node("fail", Arc::new(Failing))
        .set_entry_point("a")
        .add_edge("a", "fail")
        .add_edge("fail", Route::End);
    let err = graph
        .compile()
        .unwrap()
        .invoke(CycleState::default(), None)
        .await
        .unwrap_err();
    match err {
        RunError::Node { node, .. } => assert_eq!(node, "fail"),
        other => panic!("expected Node error, got {other}"),
    }
}

/// **Scenario**: A conditional entry point picks the first node from the initial state.
#[tokio::test]
async fn invoke_conditional_entry() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("low", Arc::new(Visit("low")))
        .add_node("high", Arc::new(Visit("high")))
        .set_conditional_entry_point(
            Arc::new(FnRouter::new(|s: &CycleState| {
                Route::Node(if s.counter > 10 { "high" } else { "low" })
            })),
            ["low", "high"],
        )
        .add_edge("low", Route::End)
        .add_edge("high", Route::End);
    let compiled = graph.compile().unwrap();

    let out = compiled.invoke(CycleState::default(), None).await.unwrap();
    assert_eq!(out.log, vec!["low"]);
    let out = compiled
        .invoke(
            CycleState {
                counter: 20,
                ..CycleState::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(out.log, vec!["high"]);
}

/// **Scenario**: A router returning a target it did not declare fails with UnexpectedRoute.
#[tokio::test]
async fn invoke_undeclared_route_fails() {
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("a", Arc::new(Visit("a")))
        .add_node("b", Arc::new(Visit("b")))
        .set_entry_point("a")
        .add_conditional_edges("a", stop_at(None, "b"), [Route::End])
        .add_edge("b", Route::End);
    let err = graph
        .compile()
        .unwrap()
        .invoke(CycleState::default(), None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, RunError::UnexpectedRoute { ref from, ref to } if from == "a" && to == "b"),
        "{err}"
    );
    assert_eq!(err.kind(), ErrorKind::GraphConfigError);
}

/// Cancels the token while running; the engine stops before the next node.
struct CancelOnRun(CancellationToken);

#[async_trait]
impl Node<CycleState> for CancelOnRun {
    async fn run(&self, state: &CycleState) -> Result<Patch, NodeError> {
        self.0.cancel();
        Ok(Patch::new().set("counter", &(state.counter + 1))?)
    }
}

/// **Scenario**: Cancellation is checked at the top of each iteration; the partial state is kept.
#[tokio::test]
async fn invoke_cancellation_between_nodes() {
    let token = CancellationToken::new();
    let mut graph = StateGraph::<CycleState, &'static str>::new();
    graph
        .add_node("cancel", Arc::new(CancelOnRun(token.clone())))
        .add_node("after", Arc::new(Visit("after")))
        .set_entry_point("cancel")
        .add_edge("cancel", "after")
        .add_edge("after", Route::End);
    let err = graph
        .compile()
        .unwrap()
        .invoke(
            CycleState::default(),
            Some(RunConfig::new().with_cancellation(token)),
        )
        .await
        .unwrap_err();
    match err {
        RunError::Cancelled { node, state } => {
            assert_eq!(node, "after");
            assert_eq!(state.counter, 1);
            assert!(state.log.is_empty());
        }
        other => panic!("expected Cancelled, got {other}"),
    }
}

/// **Scenario**: One compiled graph serves concurrent independent runs.
#[tokio::test]
async fn invoke_concurrent_runs_are_independent() {
    let graph = crate::common::two_node_cycle(Some(3)).compile().unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let graph = graph.clone();
            tokio::spawn(async move {
                graph
                    .invoke(
                        CycleState {
                            counter: -i,
                            ..CycleState::default()
                        },
                        None,
                    )
                    .await
            })
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        let out = h.await.unwrap().unwrap();
        assert_eq!(out.counter, 3);
        assert_eq!(out.log.len(), 3 + i);
    }
}
