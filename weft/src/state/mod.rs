//! State types for graphs.
//!
//! - [`GraphState`]: what a state type must provide to flow through a
//!   [`StateGraph`](crate::graph::StateGraph): serde round-trip plus a declared
//!   [`StateSchema`](crate::channels::StateSchema).
//! - [`MessagesState`]: message history only (append); used by the ReAct, reflection and
//!   reflexion graphs.
//! - [`HasMessages`]: read access to the message history for the tool node and routing policies.
//!
//! # Example
//!
//! ```rust
//! use weft::{Message, MessagesState};
//!
//! let state = MessagesState::from_human("What is 2+2?");
//! assert_eq!(state.messages.len(), 1);
//! ```

mod messages_state;

pub use messages_state::MessagesState;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

use crate::channels::{MergeKind, SchemaError, StateSchema};
use crate::message::Message;

/// A state type usable by the graph engine.
///
/// The type serializes to an object whose keys are the schema's field names; the engine
/// merges node patches through [`GraphState::schema`] and decodes the result back.
pub trait GraphState:
    Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Declared fields and their merge kinds.
    fn schema() -> StateSchema;
}

/// State that carries a message history.
///
/// Writers append to [`HasMessages::MESSAGES_FIELD`]; the state's schema must declare
/// it as an append field (checked by [`require_append_messages`]).
pub trait HasMessages {
    /// Name of the append field holding the messages.
    const MESSAGES_FIELD: &'static str = "messages";

    fn messages(&self) -> &[Message];

    fn last_message(&self) -> Option<&Message> {
        self.messages().last()
    }
}

/// Fails with `WrongMergeKind` unless the message field of `S` is declared append.
///
/// Nodes that add to the history call this first so a replace declaration cannot
/// overwrite earlier turns.
pub fn require_append_messages<S>() -> Result<(), SchemaError>
where
    S: GraphState + HasMessages,
{
    S::schema().require_kind(S::MESSAGES_FIELD, MergeKind::Append)
}
