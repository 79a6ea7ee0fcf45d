//! Capability registry: constructed once, shared by nodes via `Arc`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::{Capability, CapabilityError, CapabilitySpec};

/// Maps capability names to implementations.
///
/// Names are kept sorted so [`CapabilityRegistry::specs`] is deterministic.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    entries: BTreeMap<String, Arc<dyn Capability>>,
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `capability` under its own name. Replaces an existing entry with that name.
    pub fn register(&mut self, capability: Arc<dyn Capability>) -> &mut Self {
        let name = capability.name().to_string();
        self.entries.insert(name, capability);
        self
    }

    /// Registers `capability` under `alias` (e.g. two tool names backed by one search).
    pub fn register_as(&mut self, alias: impl Into<String>, capability: Arc<dyn Capability>) -> &mut Self {
        self.entries.insert(alias.into(), capability);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, capability: Arc<dyn Capability>) -> Self {
        self.register(capability);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Capability>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names with descriptions, for prompting a model about available tools.
    pub fn specs(&self) -> Vec<CapabilitySpec> {
        self.entries
            .iter()
            .map(|(name, cap)| CapabilitySpec {
                name: name.clone(),
                description: cap.description().map(str::to_string),
            })
            .collect()
    }

    /// Calls the capability registered under `name`; unknown names fail with `NotFound`.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value, CapabilityError> {
        let capability = self
            .get(name)
            .ok_or_else(|| CapabilityError::NotFound(name.to_string()))?;
        capability.invoke(arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::FnCapability;
    use serde_json::json;

    fn echo() -> Arc<dyn Capability> {
        Arc::new(FnCapability::new("echo", |args| Ok(args)).with_description("Echo arguments"))
    }

    /// **Scenario**: call dispatches by name and returns the capability result.
    #[tokio::test]
    async fn registry_call_dispatches_by_name() {
        let registry = CapabilityRegistry::new().with(echo());
        let out = registry.call("echo", json!({"x": 1})).await.unwrap();
        assert_eq!(out, json!({"x": 1}));
    }

    /// **Scenario**: Unknown capability name fails with NotFound.
    #[tokio::test]
    async fn registry_call_unknown_name_not_found() {
        let registry = CapabilityRegistry::new();
        let err = registry.call("missing", json!({})).await.unwrap_err();
        assert_eq!(err, CapabilityError::NotFound("missing".into()));
    }

    /// **Scenario**: Aliases resolve to the same capability; specs are sorted by name.
    #[tokio::test]
    async fn registry_aliases_and_specs() {
        let mut registry = CapabilityRegistry::new();
        let cap = echo();
        registry
            .register_as("ReviseAnswer", cap.clone())
            .register_as("AnswerQuestion", cap);
        assert_eq!(registry.names(), vec!["AnswerQuestion", "ReviseAnswer"]);
        assert_eq!(
            registry.call("ReviseAnswer", json!("q")).await.unwrap(),
            json!("q")
        );
        let specs = registry.specs();
        assert_eq!(specs[0].description.as_deref(), Some("Echo arguments"));
    }
}
