//! LLM client seam for reasoning, generation and grading nodes.
//!
//! Nodes depend on a callable that takes the message history and returns assistant
//! text plus optional tool calls; this module defines the trait and a scripted mock.
//! No provider client ships with the crate: callers plug their own `LlmClient` in.

mod mock;

pub use mock::MockLlm;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::message::{Message, ToolCall};

/// Response from one completion: assistant text and tool calls (empty means none).
///
/// **Interaction**: Returned by `LlmClient::invoke()`; `ReasonNode` turns it into an AI
/// message carrying the tool calls as pending requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LlmResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }

    /// Converts into an AI message with the tool calls as pending requests.
    pub fn into_message(self) -> Message {
        if self.tool_calls.is_empty() {
            Message::ai(self.content)
        } else {
            Message::ai_with_tool_calls(self.content, self.tool_calls)
        }
    }
}

/// LLM client: given messages, returns assistant text and optional tool calls.
///
/// **Interaction**: Used by `ReasonNode`, the reflection and reflexion nodes, and
/// the RAG `generate` node.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, NodeError>;
}
