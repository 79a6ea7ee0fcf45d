//! Agent building blocks and the demo graphs built from them.
//!
//! - [`ToolNode`]: executes pending tool calls through a capability registry.
//! - [`routing`]: decision functions (tool-call presence, message and tool-result caps)
//!   and the classifier-backed [`ClassifierRouter`].
//! - [`react`], [`reflection`], [`reflexion`], [`rag`]: graph definitions.

pub mod rag;
pub mod react;
pub mod reflection;
pub mod reflexion;
pub mod routing;
mod tool_node;

pub use rag::{build_adaptive_rag_graph, build_agentic_rag_graph, RagState};
pub use react::{build_react_graph, ReactNode, ReasonNode};
pub use reflection::{build_reflection_graph, ReflectNode, ReflectionNode};
pub use reflexion::{build_reflexion_graph, reflexion_capabilities, QueryBatch, ReflexionNode};
pub use routing::{message_count_cap, tool_result_cap, tools_condition, ClassifierRouter};
pub use tool_node::ToolNode;
