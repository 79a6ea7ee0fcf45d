//! Tool node: execute the pending tool calls of the last message.
//!
//! `ToolNode` holds a [`CapabilityRegistry`] (built once, outside the graph) and
//! implements `Node<S>` for any state with a message history. Calls belonging to one
//! message are dispatched concurrently and joined; the resulting tool-result messages
//! are appended in request order.
//!
//! # Error handling
//!
//! A failing or timed-out capability never fails the node. Its tool-result message
//! carries the failure description with `is_error` set, so the reasoning node sees it
//! in the next turn and decides what to do.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, trace, warn};

use crate::capability::{value_to_text, CapabilityError, CapabilityRegistry};
use crate::channels::Patch;
use crate::error::NodeError;
use crate::graph::Node;
use crate::message::{Message, ToolCall};
use crate::state::{require_append_messages, GraphState, HasMessages};

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Executes pending tool calls through a capability registry.
#[derive(Clone)]
pub struct ToolNode {
    capabilities: Arc<CapabilityRegistry>,
    timeout: Option<Duration>,
}

impl ToolNode {
    pub fn new(capabilities: Arc<CapabilityRegistry>) -> Self {
        Self {
            capabilities,
            timeout: None,
        }
    }

    /// Bounds each capability call; a call that exceeds it yields a failure payload.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    async fn call_one(&self, call: &ToolCall) -> Result<serde_json::Value, CapabilityError> {
        let fut = self.capabilities.call(&call.name, call.arguments.clone());
        match self.timeout {
            None => fut.await,
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .unwrap_or_else(|_| {
                    Err(CapabilityError::Timeout {
                        name: call.name.clone(),
                        after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }),
        }
    }

    async fn execute(&self, call: &ToolCall) -> Message {
        debug!(tool = %call.name, call_id = %call.id, "Calling capability");
        match self.call_one(call).await {
            Ok(value) => {
                let text = value_to_text(&value);
                trace!(tool = %call.name, result = %truncate_for_log(&text, 200), "Capability result");
                Message::tool_result(call.id.clone(), text)
            }
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "Capability failed");
                Message::tool_failure(call.id.clone(), format!("Error: {}", e))
            }
        }
    }

    /// Runs every call of `calls` concurrently; results keep the order of `calls`.
    pub async fn execute_all(&self, calls: &[ToolCall]) -> Vec<Message> {
        join_all(calls.iter().map(|call| self.execute(call))).await
    }
}

#[async_trait]
impl<S> Node<S> for ToolNode
where
    S: GraphState + HasMessages,
{
    async fn run(&self, state: &S) -> Result<Patch, NodeError> {
        require_append_messages::<S>()?;
        let calls = match state.last_message() {
            Some(m) if m.has_tool_calls() => &m.pending_tool_calls,
            _ => {
                debug!("No pending tool calls");
                return Ok(Patch::empty());
            }
        };
        let results = self.execute_all(calls).await;
        Ok(Patch::new().append(S::MESSAGES_FIELD, results)?)
    }
}
