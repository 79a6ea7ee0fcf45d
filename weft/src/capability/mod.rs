//! Capabilities: external operations invoked through a fixed `(name, arguments)` interface.
//!
//! Web search, vector retrieval and relevance/hallucination classifiers are all
//! capabilities. The engine never knows what they compute; the tool node looks them up
//! by name in a [`CapabilityRegistry`] built once outside the engine and injected.
//!
//! - [`Capability`]: async trait implemented by concrete collaborators (or fakes in tests).
//! - [`FnCapability`]: wraps a synchronous closure.
//! - [`CapabilityRegistry`]: name -> capability map; supports aliases.

mod fn_capability;
mod registry;

pub use fn_capability::FnCapability;
pub use registry::CapabilityRegistry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure of one capability call.
///
/// Inside the tool node this is recorded as a failure payload on the tool-result
/// message and does not abort the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("capability not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("capability failed: {0}")]
    Failed(String),
    #[error("capability {name} timed out after {after_ms} ms")]
    Timeout { name: String, after_ms: u64 },
}

/// Description of a registered capability (name and optional description).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySpec {
    pub name: String,
    pub description: Option<String>,
}

/// An external, pluggable operation: `(arguments) -> result | failure`.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Name the capability is registered under by default.
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Invokes the capability with a JSON arguments object.
    async fn invoke(&self, arguments: Value) -> Result<Value, CapabilityError>;
}

/// Reads a binary classifier answer.
///
/// Accepts `true`/`false`, `"yes"`/`"no"` (any case), or an object carrying either
/// under `binary_score`. Anything else is `InvalidInput`.
pub fn parse_binary_score(value: &Value) -> Result<bool, CapabilityError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "yes" | "true" => Ok(true),
            "no" | "false" => Ok(false),
            other => Err(CapabilityError::InvalidInput(format!(
                "expected yes/no, got {:?}",
                other
            ))),
        },
        Value::Object(map) => match map.get("binary_score") {
            Some(inner) if !inner.is_object() => parse_binary_score(inner),
            _ => Err(CapabilityError::InvalidInput(
                "object without binary_score".to_string(),
            )),
        },
        other => Err(CapabilityError::InvalidInput(format!(
            "expected binary score, got {}",
            other
        ))),
    }
}

/// Renders a capability result as message text: strings as-is, other JSON compact.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
