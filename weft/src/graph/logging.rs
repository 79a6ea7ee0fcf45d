//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for run start/finish, node execution and state updates.

/// Log graph execution start.
pub fn log_graph_start(entry: &str, max_steps: usize) {
    tracing::info!(entry = entry, max_steps, "Starting graph execution");
}

/// Log node execution start.
pub fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id = node_id, step, "Starting node execution");
}

/// Log node execution completion with the fields its patch touches.
pub fn log_node_complete(node_id: &str, patch_fields: &[&str]) {
    tracing::debug!(node_id = node_id, fields = ?patch_fields, "Node execution complete");
}

/// Log state update after a merge.
pub fn log_state_update(node_id: &str) {
    tracing::debug!(node_id = node_id, "State updated");
}

/// Log a conditional routing decision.
pub fn log_route(from: &str, to: &str) {
    tracing::debug!(from = from, to = to, "Routing decision");
}

/// Log graph execution completion.
pub fn log_graph_complete(invocations: usize) {
    tracing::info!(invocations, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &dyn std::error::Error) {
    tracing::error!(error = %error, "Graph execution error");
}
