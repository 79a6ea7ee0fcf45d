//! Reflection loop: a generator drafts, a critic reviews, the generator revises.
//!
//! `generate` → (more than `limit` messages ? end : `reflect`) and
//! `reflect` → (more than `limit` messages ? end : `generate`). The cap is checked after
//! both nodes, so a run never holds more than `limit + 1` messages. The critique is
//! appended as a human message so the generator treats it as feedback from the user.

use std::sync::Arc;

use async_trait::async_trait;

use crate::channels::Patch;
use crate::config::EngineConfig;
use crate::error::NodeError;
use crate::graph::{CompilationError, CompiledStateGraph, Node, NodeKey, Route, StateGraph};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::{require_append_messages, GraphState, HasMessages, MessagesState};

use super::react::ReasonNode;
use super::routing::message_count_cap;

pub const GENERATION_PROMPT: &str = "You are a twitter techie influencer assistant tasked with \
writing excellent twitter posts. Generate the best twitter post possible for the user's request. \
If the user provides critique, respond with a revised version of your previous attempts.";

pub const REFLECTION_PROMPT: &str = "You are a viral twitter influencer grading a tweet. \
Generate critique and recommendations for the user's tweet. Always provide detailed \
recommendations, including requests for length, virality, style, etc.";

/// Asks the critic LLM for a critique of the history; appends it as a human message.
pub struct ReflectNode {
    critic: ReasonNode,
}

impl ReflectNode {
    pub fn new(critic: Arc<dyn LlmClient>) -> Self {
        Self {
            critic: ReasonNode::new(critic).with_system_prompt(REFLECTION_PROMPT),
        }
    }
}

#[async_trait]
impl<S> Node<S> for ReflectNode
where
    S: GraphState + HasMessages,
{
    async fn run(&self, state: &S) -> Result<Patch, NodeError> {
        require_append_messages::<S>()?;
        let critique = self.critic.reply(state.messages()).await?;
        Ok(Patch::new().append(S::MESSAGES_FIELD, [Message::human(critique.content)])?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectionNode {
    Generate,
    Reflect,
}

impl NodeKey for ReflectionNode {
    fn name(&self) -> &str {
        match self {
            ReflectionNode::Generate => "generate",
            ReflectionNode::Reflect => "reflect",
        }
    }
}

/// Builds the reflection graph; the loop ends once the history exceeds
/// `config.reflection_message_limit` messages.
pub fn build_reflection_graph(
    generator: Arc<dyn LlmClient>,
    critic: Arc<dyn LlmClient>,
    config: &EngineConfig,
) -> Result<CompiledStateGraph<MessagesState, ReflectionNode>, CompilationError> {
    let limit = config.reflection_message_limit;
    let generate = ReasonNode::new(generator).with_system_prompt(GENERATION_PROMPT);

    let mut graph =
        StateGraph::<MessagesState, ReflectionNode>::new().with_max_steps(config.max_steps);
    graph
        .add_node(ReflectionNode::Generate, Arc::new(generate))
        .add_node(ReflectionNode::Reflect, Arc::new(ReflectNode::new(critic)))
        .set_entry_point(ReflectionNode::Generate)
        .add_conditional_edges(
            ReflectionNode::Generate,
            move |s: &MessagesState| message_count_cap(s, limit, &ReflectionNode::Reflect),
            [Route::Node(ReflectionNode::Reflect), Route::End],
        )
        .add_conditional_edges(
            ReflectionNode::Reflect,
            move |s: &MessagesState| message_count_cap(s, limit, &ReflectionNode::Generate),
            [Route::Node(ReflectionNode::Generate), Route::End],
        );
    graph.compile()
}
