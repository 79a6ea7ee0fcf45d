//! Reflexion loop: draft an answer with search queries, run the searches, revise.
//!
//! `draft` → `execute_tools` → `revise` → (more than `max` tool results ? end :
//! `execute_tools`). Both actor prompts make the model answer through a tool call
//! (`AnswerQuestion` for the draft, `ReviseAnswer` for revisions) whose arguments
//! carry `answer`, `reflection` and `search_queries`; both names resolve to one
//! batch-search capability.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{json, Value};

use crate::capability::{Capability, CapabilityError, CapabilityRegistry};
use crate::config::EngineConfig;
use crate::graph::{CompilationError, CompiledStateGraph, NodeKey, Route, StateGraph};
use crate::llm::LlmClient;
use crate::message::Role;
use crate::state::{HasMessages, MessagesState};

use super::react::ReasonNode;
use super::routing::tool_result_cap;
use super::tool_node::ToolNode;

pub const ANSWER_QUESTION: &str = "AnswerQuestion";
pub const REVISE_ANSWER: &str = "ReviseAnswer";

const ACTOR_PROMPT: &str = "You are expert researcher.\n\
1. {first_instruction}\n\
2. Reflect and critique your answer. Be severe to maximize improvement.\n\
3. Recommend search queries to research information and improve your answer.";

const DRAFT_INSTRUCTION: &str = "Provide a detailed ~250 word answer.";

const REVISE_INSTRUCTION: &str = "Revise your previous answer using the new information.\n\
- You should use the previous critique to add important information to your answer.\n\
- You MUST include numerical citations in your revised answer to ensure it can be verified.\n\
- Add a \"References\" section to the bottom of your answer (which does not count towards the word limit).\n\
- You should use the previous critique to remove superfluous information from your answer and make SURE it is not more than 250 words.";

const FORMAT_REMINDER: &str = "Answer the user's question above using the required format.";

fn actor_prompt(instruction: &str) -> String {
    ACTOR_PROMPT.replace("{first_instruction}", instruction)
}

/// Runs every query in `search_queries` through one search capability.
///
/// Input: `{"search_queries": [..]}`; output: an array with one search result per
/// query, in query order. Any failing query fails the batch.
pub struct QueryBatch {
    name: String,
    search: Arc<dyn Capability>,
}

impl QueryBatch {
    pub fn new(name: impl Into<String>, search: Arc<dyn Capability>) -> Self {
        Self {
            name: name.into(),
            search,
        }
    }
}

#[async_trait]
impl Capability for QueryBatch {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some("Run the generated queries.")
    }

    async fn invoke(&self, arguments: Value) -> Result<Value, CapabilityError> {
        let queries = arguments
            .get("search_queries")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                CapabilityError::InvalidInput("search_queries must be an array".to_string())
            })?;
        let calls = queries
            .iter()
            .map(|q| self.search.invoke(json!({ "query": q })));
        let results = join_all(calls)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(results))
    }
}

/// Registry exposing `search` under both actor tool names.
pub fn reflexion_capabilities(search: Arc<dyn Capability>) -> CapabilityRegistry {
    let batch: Arc<dyn Capability> = Arc::new(QueryBatch::new("run_queries", search));
    let mut registry = CapabilityRegistry::new();
    registry
        .register_as(ANSWER_QUESTION, Arc::clone(&batch))
        .register_as(REVISE_ANSWER, batch);
    registry
}

/// The `answer` argument of the latest actor tool call, if any.
pub fn final_answer(state: &MessagesState) -> Option<&str> {
    state
        .messages()
        .iter()
        .rev()
        .filter(|m| m.role == Role::Ai)
        .find_map(|m| m.pending_tool_calls.first())
        .and_then(|call| call.arguments.get("answer"))
        .and_then(Value::as_str)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflexionNode {
    Draft,
    ExecuteTools,
    Revise,
}

impl NodeKey for ReflexionNode {
    fn name(&self) -> &str {
        match self {
            ReflexionNode::Draft => "draft",
            ReflexionNode::ExecuteTools => "execute_tools",
            ReflexionNode::Revise => "revise",
        }
    }
}

/// Builds the reflexion graph; revisions stop once the history holds more than
/// `config.reflexion_max_iterations` tool results.
pub fn build_reflexion_graph(
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn Capability>,
    config: &EngineConfig,
) -> Result<CompiledStateGraph<MessagesState, ReflexionNode>, CompilationError> {
    let max_iterations = config.reflexion_max_iterations;
    let draft = ReasonNode::new(Arc::clone(&llm))
        .with_system_prompt(actor_prompt(DRAFT_INSTRUCTION))
        .with_trailing_instruction(FORMAT_REMINDER);
    let revise = ReasonNode::new(llm)
        .with_system_prompt(actor_prompt(REVISE_INSTRUCTION))
        .with_trailing_instruction(FORMAT_REMINDER);
    let tools = ToolNode::new(Arc::new(reflexion_capabilities(search)))
        .with_timeout(config.tool_timeout);

    let mut graph =
        StateGraph::<MessagesState, ReflexionNode>::new().with_max_steps(config.max_steps);
    graph
        .add_node(ReflexionNode::Draft, Arc::new(draft))
        .add_node(ReflexionNode::ExecuteTools, Arc::new(tools))
        .add_node(ReflexionNode::Revise, Arc::new(revise))
        .set_entry_point(ReflexionNode::Draft)
        .add_edge(ReflexionNode::Draft, ReflexionNode::ExecuteTools)
        .add_edge(ReflexionNode::ExecuteTools, ReflexionNode::Revise)
        .add_conditional_edges(
            ReflexionNode::Revise,
            move |s: &MessagesState| tool_result_cap(s, max_iterations, &ReflexionNode::ExecuteTools),
            [Route::Node(ReflexionNode::ExecuteTools), Route::End],
        );
    graph.compile()
}
