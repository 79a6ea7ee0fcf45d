//! Step cap on a two-node cycle a ⇄ b.
//!
//! A run takes one step per transition to another node. With cap `m`, a run that
//! ends after `m` steps (m + 1 node invocations) succeeds; one more step fails.

use weft::{ErrorKind, RunConfig, RunError, DEFAULT_MAX_STEPS};

use crate::common::{two_node_cycle, CycleState};

const CAP: usize = 4;

/// **Scenario**: Ending exactly at step == max_steps succeeds.
#[tokio::test]
async fn cycle_ending_at_cap_succeeds() {
    let graph = two_node_cycle(Some(CAP as i64 + 1))
        .with_max_steps(CAP)
        .compile()
        .unwrap();
    let out = graph.invoke(CycleState::default(), None).await.unwrap();
    assert_eq!(out.counter, CAP as i64 + 1);
    assert_eq!(out.log, vec!["a", "b", "a", "b", "a"]);
}

/// **Scenario**: Needing step == max_steps + 1 fails with StepLimitExceeded and the partial state.
#[tokio::test]
async fn cycle_one_past_cap_fails() {
    let graph = two_node_cycle(Some(CAP as i64 + 2))
        .with_max_steps(CAP)
        .compile()
        .unwrap();
    let err = graph.invoke(CycleState::default(), None).await.unwrap_err();
    match &err {
        RunError::StepLimitExceeded { max_steps, state } => {
            assert_eq!(*max_steps, CAP);
            assert_eq!(state.counter, CAP as i64 + 1);
        }
        other => panic!("expected StepLimitExceeded, got {other}"),
    }
    assert_eq!(err.report().error, ErrorKind::StepLimitExceeded);
}

/// **Scenario**: A cycle with no terminating condition fails at the default cap.
#[tokio::test]
async fn endless_cycle_hits_default_cap() {
    let graph = two_node_cycle(None).compile().unwrap();
    let err = graph.invoke(CycleState::default(), None).await.unwrap_err();
    let state = err.partial_state().expect("partial state");
    assert_eq!(state.counter, DEFAULT_MAX_STEPS as i64 + 1);
}

/// **Scenario**: RunConfig.max_steps overrides the graph default for one run only.
#[tokio::test]
async fn run_config_overrides_cap() {
    let graph = two_node_cycle(Some(10)).with_max_steps(2).compile().unwrap();

    let err = graph.invoke(CycleState::default(), None).await.unwrap_err();
    assert!(matches!(err, RunError::StepLimitExceeded { max_steps: 2, .. }));

    let out = graph
        .invoke(CycleState::default(), Some(RunConfig::new().with_max_steps(9)))
        .await
        .unwrap();
    assert_eq!(out.counter, 10);
}
