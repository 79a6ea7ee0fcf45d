//! Reflection demo: a writer drafts a tweet and a critic sends it back until the
//! history passes `WEFT_REFLECTION_MESSAGE_LIMIT`.
//!
//! Run: `cargo run -p weft-examples --example reflection_loop -- "Write a tweet about borrow checking"`

use std::sync::Arc;

use weft::{build_reflection_graph, generate_text, LlmResponse, MessagesState, MockLlm};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = weft_examples::init()?;
    let topic = weft_examples::input_or("Write a tweet about the borrow checker");

    let writer = Arc::new(MockLlm::new(vec![
        LlmResponse::text("The borrow checker is strict."),
        LlmResponse::text("The borrow checker: strict today, no segfaults tomorrow."),
        LlmResponse::text("Fight the borrow checker once, sleep well forever. #rustlang"),
    ]));
    let critic = Arc::new(MockLlm::new(vec![
        LlmResponse::text("Too flat. Give it a payoff."),
        LlmResponse::text("Better. Add a hashtag and tighten it."),
        LlmResponse::text("Ship it."),
    ]));

    let graph = build_reflection_graph(writer, critic, &config)?;
    println!("{}", generate_text(&graph));

    let out = graph
        .invoke(MessagesState::from_human(topic), None)
        .await?;
    for m in &out.messages {
        println!("[{:?}] {}", m.role, m.content);
    }
    if let Some(tweet) = out.last_ai_reply() {
        println!("\nFinal tweet: {tweet}");
    }
    Ok(())
}
