//! State schema: which fields exist and how patches merge into them.
//!
//! Per-field merge semantics, the way graph frameworks annotate state fields:
//!
//! - **Replace** (last value wins): a question string, a boolean flag.
//! - **Append** (topic-like): message history, where each patch's sequence is
//!   concatenated onto the current one in arrival order.
//!
//! The merge kind of a field is fixed by the schema; the store never inspects
//! field content to decide how to merge.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::{Patch, SchemaError};

/// How a patch value for a field is merged into the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeKind {
    /// New value overwrites the field.
    Replace,
    /// New sequence is concatenated onto the existing sequence.
    Append,
}

/// One declared state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: MergeKind,
}

/// Declared state fields and their merge kinds.
///
/// Built once per state type (see [`GraphState::schema`](crate::state::GraphState::schema))
/// and validated when a graph is compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSchema {
    fields: Vec<FieldSpec>,
}

impl StateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field with the given merge kind.
    pub fn field(mut self, name: &'static str, kind: MergeKind) -> Self {
        self.fields.push(FieldSpec { name, kind });
        self
    }

    /// Declares a replace field.
    pub fn replace(self, name: &'static str) -> Self {
        self.field(name, MergeKind::Replace)
    }

    /// Declares an append field.
    pub fn append(self, name: &'static str) -> Self {
        self.field(name, MergeKind::Append)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Merge kind of `name`, or `None` when the field is not declared.
    pub fn kind_of(&self, name: &str) -> Option<MergeKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.kind)
    }

    /// Fails with `DuplicateField` when a field is declared twice.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for f in &self.fields {
            if !seen.insert(f.name) {
                return Err(SchemaError::DuplicateField(f.name.to_string()));
            }
        }
        Ok(())
    }

    /// Merges `patch` into `state` and returns the new state; `state` is not modified.
    ///
    /// Fails with `UndeclaredField` if the patch names a field outside the schema, with
    /// `NotASequence` if an append field gets a non-sequence, with `Decode` if a
    /// replaced value does not fit the field's type, and with `NotInState` if a written
    /// field does not survive the decode into `S`.
    pub fn merge<S>(&self, state: &S, patch: Patch) -> Result<S, SchemaError>
    where
        S: Clone + Serialize + DeserializeOwned,
    {
        self.check(&patch)?;
        if patch.is_empty() {
            return Ok(state.clone());
        }
        let mut object = match serde_json::to_value(state)
            .map_err(|e| SchemaError::Encode(e.to_string()))?
        {
            Value::Object(map) => map,
            _ => return Err(SchemaError::NotAnObject),
        };
        let written: Vec<String> = patch
            .iter()
            .filter(|(_, v)| carries_data(v))
            .map(|(f, _)| f.to_string())
            .collect();
        self.merge_into(&mut object, patch)?;
        let merged: S = serde_json::from_value(Value::Object(object))
            .map_err(|e| SchemaError::Decode(e.to_string()))?;

        // serde drops unknown keys on decode; a declared name the type lacks loses the write
        if !written.is_empty() {
            let reencoded = serde_json::to_value(&merged)
                .map_err(|e| SchemaError::Encode(e.to_string()))?;
            if let Some(field) = written.into_iter().find(|f| reencoded.get(f).is_none()) {
                return Err(SchemaError::NotInState(field));
            }
        }
        Ok(merged)
    }

    /// Fails with `WrongMergeKind` unless `name` is declared with `expected`.
    pub fn require_kind(&self, name: &str, expected: MergeKind) -> Result<(), SchemaError> {
        if self.kind_of(name) == Some(expected) {
            Ok(())
        } else {
            Err(SchemaError::WrongMergeKind {
                field: name.to_string(),
                expected,
            })
        }
    }

    /// Merges `patch` into a JSON object in place.
    ///
    /// The patch is checked before anything is written, so on error `current` is unchanged.
    pub fn merge_into(&self, current: &mut Map<String, Value>, patch: Patch) -> Result<(), SchemaError> {
        self.check(&patch)?;
        for (field, _) in patch.iter() {
            if self.kind_of(field) == Some(MergeKind::Append) {
                match current.get(field) {
                    None | Some(Value::Null) | Some(Value::Array(_)) => {}
                    Some(_) => return Err(SchemaError::NotASequence(field.to_string())),
                }
            }
        }

        for (field, value) in patch.into_entries() {
            match self.kind_of(&field) {
                Some(MergeKind::Replace) => {
                    current.insert(field, value);
                }
                Some(MergeKind::Append) => {
                    let Value::Array(items) = value else {
                        return Err(SchemaError::NotASequence(field));
                    };
                    match current.get_mut(&field) {
                        Some(Value::Array(existing)) => existing.extend(items),
                        _ => {
                            current.insert(field, Value::Array(items));
                        }
                    }
                }
                None => return Err(SchemaError::UndeclaredField(field)),
            }
        }
        Ok(())
    }

    fn check(&self, patch: &Patch) -> Result<(), SchemaError> {
        for (field, value) in patch.iter() {
            match self.kind_of(field) {
                None => return Err(SchemaError::UndeclaredField(field.to_string())),
                Some(MergeKind::Append) if !value.is_array() => {
                    return Err(SchemaError::NotASequence(field.to_string()))
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Null and empty sequences lose nothing when a field is skipped on encode.
fn carries_data(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}
