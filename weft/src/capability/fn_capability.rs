//! Capability backed by a synchronous closure.

use async_trait::async_trait;
use serde_json::Value;

use super::{Capability, CapabilityError};

/// Wraps `Fn(Value) -> Result<Value, CapabilityError>` as a [`Capability`].
///
/// Useful for in-process capabilities (calculators, canned retrievers) and test fakes.
pub struct FnCapability<F> {
    name: String,
    description: Option<String>,
    f: F,
}

impl<F> FnCapability<F>
where
    F: Fn(Value) -> Result<Value, CapabilityError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            description: None,
            f,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[async_trait]
impl<F> Capability for FnCapability<F>
where
    F: Fn(Value) -> Result<Value, CapabilityError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    async fn invoke(&self, arguments: Value) -> Result<Value, CapabilityError> {
        (self.f)(arguments)
    }
}
