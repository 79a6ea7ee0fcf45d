//! Routing policies used by the demo graphs.
//!
//! Three are plain decision functions over the message history; the fourth,
//! [`ClassifierRouter`], asks an external classifier capability and maps its label
//! to one of a fixed set of nodes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::capability::{Capability, CapabilityError};
use crate::error::NodeError;
use crate::graph::{NodeKey, Route, Router};
use crate::state::{GraphState, HasMessages};

/// Routes to `tools` when the last message carries pending tool calls, else ends.
pub fn tools_condition<S, N>(state: &S, tools: &N) -> Route<N>
where
    S: HasMessages,
    N: Clone,
{
    match state.last_message() {
        Some(m) if m.has_tool_calls() => Route::Node(tools.clone()),
        _ => Route::End,
    }
}

/// Ends once the history holds more than `limit` messages, else routes to `next`.
pub fn message_count_cap<S, N>(state: &S, limit: usize, next: &N) -> Route<N>
where
    S: HasMessages,
    N: Clone,
{
    if state.messages().len() > limit {
        Route::End
    } else {
        Route::Node(next.clone())
    }
}

/// Ends once the history holds more than `max` tool results, else routes to `next`.
pub fn tool_result_cap<S, N>(state: &S, max: usize, next: &N) -> Route<N>
where
    S: HasMessages,
    N: Clone,
{
    let tool_results = state.messages().iter().filter(|m| m.is_tool_result()).count();
    if tool_results > max {
        Route::End
    } else {
        Route::Node(next.clone())
    }
}

type InputFn<S> = Arc<dyn Fn(&S) -> Value + Send + Sync>;

/// Routes by the categorical output of a classifier capability.
///
/// The classifier may answer with a bare string label or an object; for objects the
/// label is read from `label_field`. Labels are compared case-insensitively. An unknown
/// label fails the run: this edge has no terminal option.
pub struct ClassifierRouter<S, N> {
    classifier: Arc<dyn Capability>,
    input: InputFn<S>,
    label_field: Option<String>,
    labels: Vec<(String, N)>,
}

impl<S, N> ClassifierRouter<S, N>
where
    S: GraphState,
    N: NodeKey,
{
    /// `input` builds the classifier arguments from state.
    pub fn new<F>(classifier: Arc<dyn Capability>, input: F) -> Self
    where
        F: Fn(&S) -> Value + Send + Sync + 'static,
    {
        Self {
            classifier,
            input: Arc::new(input),
            label_field: None,
            labels: Vec::new(),
        }
    }

    pub fn with_label_field(mut self, field: impl Into<String>) -> Self {
        self.label_field = Some(field.into());
        self
    }

    /// Maps `label` to `node`.
    pub fn on(mut self, label: impl Into<String>, node: N) -> Self {
        self.labels.push((label.into().to_lowercase(), node));
        self
    }

    /// Every node this router can return, for `add_router`/`set_conditional_entry_point`.
    pub fn targets(&self) -> Vec<N> {
        let mut out: Vec<N> = Vec::new();
        for (_, n) in &self.labels {
            if !out.contains(n) {
                out.push(n.clone());
            }
        }
        out
    }

    fn label_of<'a>(&self, output: &'a Value) -> Option<&'a str> {
        match (output, &self.label_field) {
            (Value::String(s), _) => Some(s.as_str()),
            (Value::Object(map), Some(field)) => map.get(field).and_then(Value::as_str),
            _ => None,
        }
    }
}

#[async_trait]
impl<S, N> Router<S, N> for ClassifierRouter<S, N>
where
    S: GraphState,
    N: NodeKey,
{
    async fn route(&self, state: &S) -> Result<Route<N>, NodeError> {
        let output = self.classifier.invoke((self.input)(state)).await?;
        let label = self.label_of(&output).ok_or_else(|| {
            CapabilityError::InvalidInput(format!(
                "{} returned no label: {}",
                self.classifier.name(),
                output
            ))
        })?;
        let wanted = label.trim().to_lowercase();
        let node = self
            .labels
            .iter()
            .find(|(l, _)| *l == wanted)
            .map(|(_, n)| n.clone())
            .ok_or_else(|| {
                CapabilityError::InvalidInput(format!(
                    "{} returned unknown label {:?}",
                    self.classifier.name(),
                    label
                ))
            })?;
        tracing::debug!(classifier = self.classifier.name(), label = %wanted, to = node.name(), "Classifier routed");
        Ok(Route::Node(node))
    }
}
