//! ReAct demo: a scripted model calls a calculator and a clock, then answers.
//!
//! Run: `cargo run -p weft-examples --example react_tools -- "What is 6 * 7?"`

use std::sync::Arc;

use serde_json::{json, Value};
use weft::{
    build_react_graph, generate_mermaid, CapabilityError, CapabilityRegistry, FnCapability,
    LlmResponse, MessagesState, MockLlm, ToolCall,
};

fn multiply(args: Value) -> Result<Value, CapabilityError> {
    let a = args["a"]
        .as_f64()
        .ok_or_else(|| CapabilityError::InvalidInput("a must be a number".into()))?;
    let b = args["b"]
        .as_f64()
        .ok_or_else(|| CapabilityError::InvalidInput("b must be a number".into()))?;
    Ok(json!(a * b))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = weft_examples::init()?;
    let question = weft_examples::input_or("What is 6 * 7, and what time is it?");

    let mut registry = CapabilityRegistry::new();
    registry
        .register(Arc::new(
            FnCapability::new("multiply", multiply).with_description("Multiply a by b."),
        ))
        .register(Arc::new(
            FnCapability::new("get_time", |_| Ok(json!("12:00 UTC")))
                .with_description("Current time."),
        ));

    let llm = Arc::new(MockLlm::new(vec![
        LlmResponse::with_tool_calls(
            "",
            vec![
                ToolCall::new("", "multiply", json!({"a": 6, "b": 7})),
                ToolCall::new("", "get_time", json!({})),
            ],
        ),
        LlmResponse::text("6 * 7 = 42, and it is 12:00 UTC."),
    ]));

    let graph = build_react_graph(llm, Arc::new(registry), &config)?;
    println!("{}", generate_mermaid(&graph));

    let out = graph
        .invoke(MessagesState::from_human(question), None)
        .await?;
    for m in &out.messages {
        println!("[{:?}] {}", m.role, m.content);
    }
    Ok(())
}
