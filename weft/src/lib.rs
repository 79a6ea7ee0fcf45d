//! # Weft
//!
//! A graph execution engine for stateful, cyclic LLM-agent workflows. One typed state
//! flows through nodes; each node returns a partial update ([`Patch`]) that the engine
//! merges through the state's declared schema (replace or append per field).
//!
//! ## Design principles
//!
//! - **Declared state**: a state type implements [`GraphState`] and lists its fields with
//!   their merge kinds. A patch naming any other field fails the run with a schema error.
//! - **Closed node names**: each graph names its nodes with a small enum implementing
//!   [`NodeKey`]; edges return [`Route::Node`] or [`Route::End`].
//! - **Validated up front**: [`StateGraph::compile`] rejects missing entries, nodes without
//!   an outgoing edge, and edges to unknown nodes before anything runs.
//! - **Bounded loops**: every run has a step cap; exceeding it fails with the partial state.
//! - **Isolated tool failures**: [`ToolNode`] records a failing capability call as an error
//!   tool-result message instead of aborting the run.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Router`], [`RunConfig`],
//!   [`RunError`], [`GraphCatalog`], visualization.
//! - [`channels`]: [`StateSchema`], [`Patch`], [`MergeKind`].
//! - [`state`]: [`GraphState`], [`HasMessages`], [`MessagesState`].
//! - [`message`]: [`Message`], [`Role`], [`ToolCall`].
//! - [`capability`]: [`Capability`], [`CapabilityRegistry`], [`FnCapability`].
//! - [`llm`]: [`LlmClient`], [`MockLlm`].
//! - [`agent`]: [`ToolNode`], routing policies, and the ReAct, reflection, reflexion and
//!   RAG graphs.
//! - [`config`]: [`EngineConfig`] from `WEFT_*` environment variables.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use weft::{Message, MessagesState, Patch, Route, StateGraph};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = StateGraph::<MessagesState, &'static str>::new();
//! graph
//!     .add_fn_node("echo", |s: &MessagesState| {
//!         let text = s.messages.last().map(|m| m.content.clone()).unwrap_or_default();
//!         Ok(Patch::new().append("messages", [Message::ai(text)])?)
//!     })
//!     .set_entry_point("echo")
//!     .add_edge("echo", Route::End);
//! let graph = graph.compile()?;
//!
//! let out = graph.invoke(MessagesState::from_human("hello"), None).await?;
//! assert_eq!(out.messages.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! Runnable demos live in the `weft-examples` crate: `react_tools`, `reflection_loop`,
//! `reflexion`, `adaptive_rag`.

pub mod agent;
pub mod capability;
pub mod channels;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod state;

pub use agent::{
    build_adaptive_rag_graph, build_agentic_rag_graph, build_react_graph, build_reflection_graph,
    build_reflexion_graph, ClassifierRouter, RagState, ReasonNode, ToolNode,
};
pub use capability::{
    parse_binary_score, Capability, CapabilityError, CapabilityRegistry, CapabilitySpec,
    FnCapability,
};
pub use channels::{FieldSpec, MergeKind, Patch, SchemaError, StateSchema};
pub use config::{ConfigError, EngineConfig};
pub use error::NodeError;
pub use graph::{
    generate_mermaid, generate_text, CompilationError, CompiledStateGraph, ConditionalEdge, Edge,
    EntryPoint, ErrorKind, ErrorReport, FnNode, FnRouter, GraphCatalog, Node, NodeKey, Route,
    Router, RunConfig, RunError, RunnableGraph, StateGraph, DEFAULT_MAX_STEPS, END, START,
};
pub use llm::{LlmClient, LlmResponse, MockLlm};
pub use message::{Message, Role, ToolCall};
pub use state::{require_append_messages, GraphState, HasMessages, MessagesState};
