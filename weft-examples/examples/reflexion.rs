//! Reflexion demo: draft an answer with search queries, run them, revise with citations.
//!
//! Run: `cargo run -p weft-examples --example reflexion -- "Why do teams adopt Rust?"`

use std::sync::Arc;

use serde_json::{json, Value};
use weft::agent::reflexion::{final_answer, ANSWER_QUESTION, REVISE_ANSWER};
use weft::{
    build_reflexion_graph, generate_mermaid, Capability, FnCapability, LlmResponse,
    MessagesState, MockLlm, ToolCall,
};

fn actor(name: &str, answer: &str, queries: &[&str]) -> LlmResponse {
    LlmResponse::with_tool_calls(
        "",
        vec![ToolCall::new(
            "",
            name,
            json!({
                "answer": answer,
                "reflection": { "missing": "sources", "superfluous": "none" },
                "search_queries": queries,
            }),
        )],
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = weft_examples::init()?;
    let question = weft_examples::input_or("Why do teams adopt Rust?");

    let search: Arc<dyn Capability> = Arc::new(FnCapability::new("search", |args: Value| {
        let q = args["query"].as_str().unwrap_or_default();
        Ok(json!({ "results": [{ "content": format!("survey notes on {q}") }] }))
    }));
    let llm = Arc::new(MockLlm::new(vec![
        actor(ANSWER_QUESTION, "Memory safety.", &["rust memory safety survey"]),
        actor(REVISE_ANSWER, "Memory safety [1].", &["rust performance"]),
        actor(REVISE_ANSWER, "Memory safety [1] and speed [2].", &["rust tooling"]),
        actor(
            REVISE_ANSWER,
            "Memory safety [1], speed [2] and tooling [3].\n\nReferences: [1] [2] [3]",
            &[],
        ),
    ]));

    let graph = build_reflexion_graph(llm, search, &config)?;
    println!("{}", generate_mermaid(&graph));

    let out = graph
        .invoke(MessagesState::from_human(question), None)
        .await?;
    println!("messages: {}, searches: {}", out.messages.len(), out.tool_result_count());
    println!("{}", final_answer(&out).unwrap_or("(no answer)"));
    Ok(())
}
