//! Adaptive RAG demo: route the question, retrieve or search, grade, generate, check.
//!
//! Questions mentioning "news" go to web search; the rest hit the in-memory store.
//!
//! Run: `cargo run -p weft-examples --example adaptive_rag -- "What is agent memory?"`

use std::sync::Arc;

use serde_json::{json, Value};
use weft::agent::rag::{build_adaptive_rag_graph, AdaptiveRagGraders, RagCapabilities, RagState};
use weft::{generate_mermaid, Capability, FnCapability, LlmResponse, MockLlm};

const CORPUS: &[&str] = &[
    "Agent memory: short-term memory is the context window; long-term memory is an external store.",
    "Task decomposition: chain of thought breaks a task into smaller steps.",
    "Banana bread needs three ripe bananas.",
];

fn capability<F>(name: &str, f: F) -> Arc<dyn Capability>
where
    F: Fn(Value) -> Result<Value, weft::CapabilityError> + Send + Sync + 'static,
{
    Arc::new(FnCapability::new(name, f))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = weft_examples::init()?;
    let question = weft_examples::input_or("What is agent memory?");

    let caps = RagCapabilities {
        retriever: capability("retriever", |_| Ok(json!(CORPUS))),
        retrieval_grader: capability("retrieval_grader", |args| {
            let relevant = !args["document"].as_str().unwrap_or_default().contains("Banana");
            Ok(json!({ "binary_score": if relevant { "yes" } else { "no" } }))
        }),
        web_search: capability("web_search", |args| {
            let q = args["query"].as_str().unwrap_or_default();
            Ok(json!({ "results": [{ "content": format!("Latest coverage of: {q}") }] }))
        }),
        generator: Arc::new(MockLlm::new(vec![LlmResponse::text(
            "Agents keep short-term memory in context and long-term memory in an external store.",
        )])),
    };
    let graders = AdaptiveRagGraders {
        question_router: capability("question_router", |args| {
            let q = args["question"].as_str().unwrap_or_default();
            let datasource = if q.contains("news") { "websearch" } else { "vectorstore" };
            Ok(json!({ "datasource": datasource }))
        }),
        hallucination_grader: capability("hallucination_grader", |_| Ok(json!("yes"))),
        answer_grader: capability("answer_grader", |_| Ok(json!({ "binary_score": "yes" }))),
    };

    let graph = build_adaptive_rag_graph(&caps, &graders, &config)?;
    println!("{}", generate_mermaid(&graph));

    match graph.invoke(RagState::new(question), None).await {
        Ok(out) => {
            println!("documents used: {}", out.documents.map_or(0, |d| d.len()));
            println!("{}", out.generation);
        }
        Err(e) => {
            let report = e.report();
            eprintln!("{:?}: {}", report.error, report.detail);
        }
    }
    Ok(())
}
