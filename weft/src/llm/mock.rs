//! Mock LLM for tests and examples.
//!
//! Returns scripted responses in order and repeats the last one once the script runs
//! out, so cyclic graphs keep getting an answer. Records every prompt it receives.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::{Message, ToolCall};

/// Mock LLM with a fixed script of responses.
///
/// Tool calls scripted with an empty id get a fresh uuid so the tool node can pair
/// results with requests.
///
/// **Interaction**: Implements `LlmClient`; used by demo graphs in tests and examples.
pub struct MockLlm {
    script: Vec<LlmResponse>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    pub fn new(script: Vec<LlmResponse>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answers `content` with no tool calls.
    pub fn with_reply(content: impl Into<String>) -> Self {
        Self::new(vec![LlmResponse::text(content)])
    }

    /// Answers with one round of tool calls, then `final_answer`.
    pub fn tools_then_reply(tool_calls: Vec<ToolCall>, final_answer: impl Into<String>) -> Self {
        Self::new(vec![
            LlmResponse::with_tool_calls("", tool_calls),
            LlmResponse::text(final_answer),
        ])
    }

    /// Number of completed `invoke` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Message histories received so far, oldest first.
    pub fn prompts(&self) -> Vec<Vec<Message>> {
        match self.prompts.lock() {
            Ok(p) => p.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, NodeError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.prompts.lock() {
            Ok(mut p) => p.push(messages.to_vec()),
            Err(poisoned) => poisoned.into_inner().push(messages.to_vec()),
        }
        let scripted = self
            .script
            .get(n)
            .or_else(|| self.script.last())
            .ok_or_else(|| NodeError::Llm("mock has no scripted responses".to_string()))?;

        let mut response = scripted.clone();
        for call in &mut response.tool_calls {
            if call.id.is_empty() {
                call.id = format!("call-{}", uuid::Uuid::new_v4());
            }
        }
        Ok(response)
    }
}
