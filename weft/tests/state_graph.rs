//! Integration tests for StateGraph: compile validation, invoke, step cap.
//!
//! Tests are split into modules under `state_graph/`:
//! - `common`: shared state (CycleState) and node helpers
//! - `compile_fail`: graph configuration errors found at compile time
//! - `invoke`: run results, schema errors, routing, cancellation
//! - `step_limit`: step cap boundaries on a two-node cycle


#[path = "state_graph/common.rs"]
mod common;

#[path = "state_graph/compile_fail.rs"]
mod compile_fail;

#[path = "state_graph/invoke.rs"]
mod invoke;

#[path = "state_graph/step_limit.rs"]
mod step_limit;
