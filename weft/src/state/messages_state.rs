//! Message-history state shared by the conversational graphs.

use serde::{Deserialize, Serialize};

use crate::channels::StateSchema;
use crate::message::{Message, Role};

use super::{GraphState, HasMessages};

/// State with a single append field: the conversation so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagesState {
    pub messages: Vec<Message>,
}

impl MessagesState {
    /// Fresh state seeded with one human message.
    pub fn from_human(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::human(content)],
        }
    }

    /// Content of the last `Ai` message, if any.
    pub fn last_ai_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Ai)
            .map(|m| m.content.as_str())
    }

    /// Number of tool-result messages in the history.
    pub fn tool_result_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_tool_result()).count()
    }
}

impl GraphState for MessagesState {
    fn schema() -> StateSchema {
        StateSchema::new().append("messages")
    }
}

impl HasMessages for MessagesState {
    fn messages(&self) -> &[Message] {
        &self.messages
    }
}
