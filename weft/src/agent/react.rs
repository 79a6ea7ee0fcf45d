//! ReAct loop: reason with the LLM, execute requested tools, reason again.
//!
//! `agent_reason` → (tool calls pending ? `act` : end); `act` → `agent_reason`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::capability::CapabilityRegistry;
use crate::channels::Patch;
use crate::config::EngineConfig;
use crate::error::NodeError;
use crate::graph::{CompilationError, CompiledStateGraph, Node, NodeKey, Route, StateGraph};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::{require_append_messages, GraphState, HasMessages, MessagesState};

use super::routing::tools_condition;
use super::tool_node::ToolNode;

pub const REACT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that can use tools to answer questions.";

/// Calls the LLM with the message history and appends its reply.
///
/// The prompt is `[system_prompt?, ...history, trailing_instruction?]`; the reply keeps
/// any tool calls as pending requests for the tool node.
pub struct ReasonNode {
    llm: Arc<dyn LlmClient>,
    system_prompt: Option<String>,
    trailing_instruction: Option<String>,
}

impl ReasonNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_prompt: None,
            trailing_instruction: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// System message placed after the history.
    pub fn with_trailing_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.trailing_instruction = Some(instruction.into());
        self
    }

    pub(crate) fn prompt(&self, history: &[Message]) -> Vec<Message> {
        let mut prompt = Vec::with_capacity(history.len() + 2);
        if let Some(p) = &self.system_prompt {
            prompt.push(Message::system(p.clone()));
        }
        prompt.extend_from_slice(history);
        if let Some(t) = &self.trailing_instruction {
            prompt.push(Message::system(t.clone()));
        }
        prompt
    }

    pub(crate) async fn reply(&self, history: &[Message]) -> Result<Message, NodeError> {
        let response = self.llm.invoke(&self.prompt(history)).await?;
        Ok(response.into_message())
    }
}

#[async_trait]
impl<S> Node<S> for ReasonNode
where
    S: GraphState + HasMessages,
{
    async fn run(&self, state: &S) -> Result<Patch, NodeError> {
        require_append_messages::<S>()?;
        let reply = self.reply(state.messages()).await?;
        Ok(Patch::new().append(S::MESSAGES_FIELD, [reply])?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactNode {
    AgentReason,
    Act,
}

impl NodeKey for ReactNode {
    fn name(&self) -> &str {
        match self {
            ReactNode::AgentReason => "agent_reason",
            ReactNode::Act => "act",
        }
    }
}

/// Builds the ReAct graph over `MessagesState`.
pub fn build_react_graph(
    llm: Arc<dyn LlmClient>,
    capabilities: Arc<CapabilityRegistry>,
    config: &EngineConfig,
) -> Result<CompiledStateGraph<MessagesState, ReactNode>, CompilationError> {
    let reason = ReasonNode::new(llm).with_system_prompt(REACT_SYSTEM_PROMPT);
    let act = ToolNode::new(capabilities).with_timeout(config.tool_timeout);

    let mut graph = StateGraph::<MessagesState, ReactNode>::new().with_max_steps(config.max_steps);
    graph
        .add_node(ReactNode::AgentReason, Arc::new(reason))
        .add_node(ReactNode::Act, Arc::new(act))
        .set_entry_point(ReactNode::AgentReason)
        .add_conditional_edges(
            ReactNode::AgentReason,
            |s: &MessagesState| tools_condition(s, &ReactNode::Act),
            [Route::Node(ReactNode::Act), Route::End],
        )
        .add_edge(ReactNode::Act, ReactNode::AgentReason);
    graph.compile()
}
