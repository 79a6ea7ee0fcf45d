//! Graph visualization utilities.
//!
//! Exports the compiled structure as a Mermaid flowchart or a plain text listing.
//! Fixed edges are solid; conditional edges are dashed and list every declared target.

use std::fmt::Write;

use crate::state::GraphState;

use super::conditional::{Edge, EntryPoint};
use super::route::{NodeKey, Route, END, START};
use super::CompiledStateGraph;

fn mermaid_id(route_name: &str) -> String {
    route_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Generate a Mermaid `flowchart` of the graph.
pub fn generate_mermaid<S, N>(graph: &CompiledStateGraph<S, N>) -> String
where
    S: GraphState,
    N: NodeKey,
{
    let mut out = String::from("flowchart TD\n");
    let _ = writeln!(out, "    {}([START])", mermaid_id(START));
    let _ = writeln!(out, "    {}([END])", mermaid_id(END));
    for key in graph.node_keys() {
        let _ = writeln!(out, "    {}[{}]", mermaid_id(key.name()), key.name());
    }

    match graph.entry() {
        EntryPoint::Node(n) => {
            let _ = writeln!(out, "    {} --> {}", mermaid_id(START), mermaid_id(n.name()));
        }
        EntryPoint::Conditional(edge) => {
            for target in edge.targets() {
                let _ = writeln!(
                    out,
                    "    {} -.-> {}",
                    mermaid_id(START),
                    mermaid_id(target.name())
                );
            }
        }
    }

    for key in graph.node_keys() {
        let from = mermaid_id(key.name());
        match graph.edge(key) {
            Some(Edge::Fixed(to)) => {
                let _ = writeln!(out, "    {} --> {}", from, mermaid_id(to.name()));
            }
            Some(Edge::Conditional(edge)) => {
                for to in edge.targets() {
                    let _ = writeln!(out, "    {} -.-> {}", from, mermaid_id(to.name()));
                }
            }
            None => {}
        }
    }
    out
}

/// Generate a simple text representation of the graph structure.
pub fn generate_text<S, N>(graph: &CompiledStateGraph<S, N>) -> String
where
    S: GraphState,
    N: NodeKey,
{
    let names = |targets: &[Route<N>]| {
        targets
            .iter()
            .map(|t| t.name().to_string())
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut text = String::new();
    let _ = writeln!(text, "Graph Structure:");
    let _ = writeln!(text, "Nodes: {}", graph.node_keys().len());
    let _ = writeln!(text, "Max steps: {}", graph.max_steps());
    let _ = writeln!(text, "\nEdges:");
    match graph.entry() {
        EntryPoint::Node(n) => {
            let _ = writeln!(text, "  {} -> {}", START, n.name());
        }
        EntryPoint::Conditional(edge) => {
            let _ = writeln!(text, "  {} -?-> {}", START, names(edge.targets()));
        }
    }
    for key in graph.node_keys() {
        match graph.edge(key) {
            Some(Edge::Fixed(to)) => {
                let _ = writeln!(text, "  {} -> {}", key.name(), to.name());
            }
            Some(Edge::Conditional(edge)) => {
                let _ = writeln!(text, "  {} -?-> {}", key.name(), names(edge.targets()));
            }
            None => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::Patch;
    use crate::graph::StateGraph;
    use crate::MessagesState;

    fn graph() -> CompiledStateGraph<MessagesState, &'static str> {
        let mut g = StateGraph::<MessagesState, &'static str>::new();
        g.add_fn_node("generate", |_| Ok(Patch::empty()))
            .add_fn_node("reflect", |_| Ok(Patch::empty()))
            .set_entry_point("generate")
            .add_conditional_edges(
                "generate",
                |_| Route::End,
                [Route::Node("reflect"), Route::End],
            )
            .add_edge("reflect", "generate");
        g.compile().unwrap()
    }

    #[test]
    fn test_generate_mermaid() {
        let m = generate_mermaid(&graph());
        assert!(m.starts_with("flowchart TD"));
        assert!(m.contains("__start__ --> generate"));
        assert!(m.contains("generate -.-> reflect"));
        assert!(m.contains("generate -.-> __end__"));
        assert!(m.contains("reflect --> generate"));
    }

    #[test]
    fn test_generate_text() {
        let text = generate_text(&graph());
        assert!(text.contains("Graph Structure"));
        assert!(text.contains("Nodes: 2"));
        assert!(text.contains("generate -?-> reflect | __end__"));
        assert!(text.contains(START));
    }
}
