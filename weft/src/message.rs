//! Message types for agent state.
//!
//! A message is one turn in the conversation: role, text content, optional pending
//! tool calls (from the model) and, for tool results, the id of the call it answers.
//! Serialized as `{role, content, pendingToolCalls?, respondsToId?, isError?}` so any
//! UI or log can consume transcripts directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Ai,
    Tool,
}

/// A single tool invocation requested by the model.
///
/// `arguments` is the JSON object passed to the capability named `name`; `id`
/// links the request to the tool-result message that answers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// One turn in the conversation. Immutable once appended to state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Tool invocations the model wants executed; only on `Ai` messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_tool_calls: Vec<ToolCall>,
    /// For `Tool` messages: id of the tool call this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responds_to_id: Option<String>,
    /// For `Tool` messages: the content is a failure description rather than a result.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            pending_tool_calls: vec![],
            responds_to_id: None,
            is_error: false,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::plain(Role::Human, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::plain(Role::Ai, content)
    }

    /// Model reply that requests tool invocations.
    pub fn ai_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            pending_tool_calls: tool_calls,
            ..Self::plain(Role::Ai, content)
        }
    }

    /// Successful tool result answering `call_id`.
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            responds_to_id: Some(call_id.into()),
            ..Self::plain(Role::Tool, content)
        }
    }

    /// Failed tool result answering `call_id`; `error` describes the failure.
    pub fn tool_failure(call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            responds_to_id: Some(call_id.into()),
            is_error: true,
            ..Self::plain(Role::Tool, error)
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.pending_tool_calls.is_empty()
    }

    pub fn is_tool_result(&self) -> bool {
        self.role == Role::Tool
    }
}
