//! Partial state update returned by a node.
//!
//! A `Patch` is an ordered list of `(field, value)` pairs. Values are JSON so the
//! state store can apply replace/append semantics without knowing the field types;
//! the merged object is decoded back into the typed state afterwards.

use serde::Serialize;
use serde_json::Value;

use super::SchemaError;

/// Partial state update: only the fields a node wants to change.
///
/// Fields absent from the patch are left untouched by the merge. For append fields
/// the value must be a sequence (possibly a singleton); use [`Patch::append`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    entries: Vec<(String, Value)>,
}

impl Patch {
    /// Creates an empty patch; merging it leaves state unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// No-op patch, for nodes that only observe state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets `field` to the serialized `value` (replace semantics for replace fields).
    pub fn set<T>(self, field: impl Into<String>, value: &T) -> Result<Self, SchemaError>
    where
        T: Serialize + ?Sized,
    {
        let field = field.into();
        let value = serde_json::to_value(value)
            .map_err(|e| SchemaError::Encode(format!("{}: {}", field, e)))?;
        Ok(self.set_value(field, value))
    }

    /// Adds `items` as a sequence value for `field`; appended for append fields.
    pub fn append<T, I>(self, field: impl Into<String>, items: I) -> Result<Self, SchemaError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let field = field.into();
        let items = items
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SchemaError::Encode(format!("{}: {}", field, e)))?;
        Ok(self.set_value(field, Value::Array(items)))
    }

    /// Adds a raw JSON value for `field`.
    pub fn set_value(mut self, field: impl Into<String>, value: Value) -> Self {
        self.entries.push((field.into(), value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Field names in the order they were added.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    /// Last value added for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }
}
