//! State store errors.

use thiserror::Error;

use super::MergeKind;

/// Errors raised while declaring a state schema or merging a patch into state.
///
/// These are structural: a patch that names an undeclared field is a bug in the
/// node that produced it, so the engine surfaces it as a run failure instead of retrying.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The patch names a field the state schema does not declare.
    #[error("undeclared state field: {0}")]
    UndeclaredField(String),

    /// An append field received (or currently holds) a value that is not a sequence.
    #[error("append field {0} requires a sequence value")]
    NotASequence(String),

    /// The schema declares the same field twice.
    #[error("duplicate state field: {0}")]
    DuplicateField(String),

    /// The state type does not serialize to a JSON object (named fields).
    #[error("state must serialize to an object with named fields")]
    NotAnObject,

    /// A patch value or the state could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The merged state could not be decoded back (e.g. wrong value type for a field).
    #[error("decode failed: {0}")]
    Decode(String),

    /// The schema declares a field the state type does not have; a write to it would be lost.
    #[error("declared field {0} is not part of the state type")]
    NotInState(String),

    /// A field is declared with a different merge kind than its writers require.
    #[error("field {field} must be declared {expected:?}")]
    WrongMergeKind { field: String, expected: MergeKind },
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of UndeclaredField names the field.
    #[test]
    fn schema_error_display_undeclared_field() {
        let s = SchemaError::UndeclaredField("bogus".into()).to_string();
        assert!(s.contains("undeclared"), "{}", s);
        assert!(s.contains("bogus"), "{}", s);
    }

    /// **Scenario**: Display of NotASequence mentions the append field.
    #[test]
    fn schema_error_display_not_a_sequence() {
        let s = SchemaError::NotASequence("messages".into()).to_string();
        assert!(s.contains("messages"), "{}", s);
        assert!(s.contains("sequence"), "{}", s);
    }
}
