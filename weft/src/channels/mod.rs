//! State store: declared fields, merge kinds, and partial updates.
//!
//! Nodes return a [`Patch`]; the engine merges it into the running state through the
//! state type's [`StateSchema`]. Each field is either [`MergeKind::Replace`] (last value)
//! or [`MergeKind::Append`] (sequence concatenation).

mod error;
mod patch;
mod schema;

pub use error::SchemaError;
pub use patch::Patch;
pub use schema::{FieldSpec, MergeKind, StateSchema};
