//! Reflection loop: generate and critique until the history passes the message limit.


use std::sync::Arc;

use weft::agent::reflection::{GENERATION_PROMPT, REFLECTION_PROMPT};
use weft::{build_reflection_graph, EngineConfig, MessagesState, MockLlm, Role};

/// **Scenario**: With the default limit of 6 the run ends with exactly 7 messages.
#[tokio::test]
async fn reflection_stops_after_seven_messages() {
    let generator = Arc::new(MockLlm::with_reply("Rust ships. #rustlang"));
    let critic = Arc::new(MockLlm::with_reply("Add a hook and an emoji."));
    let graph =
        build_reflection_graph(generator.clone(), critic.clone(), &EngineConfig::default())
            .unwrap();
    let out = graph
        .invoke(MessagesState::from_human("Write a tweet about Rust"), None)
        .await
        .unwrap();

    assert_eq!(out.messages.len(), 7);
    let roles: Vec<Role> = out.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::Human,
            Role::Ai,
            Role::Human,
            Role::Ai,
            Role::Human,
            Role::Ai,
            Role::Human
        ]
    );
    assert_eq!(generator.calls(), 3);
    assert_eq!(critic.calls(), 3);
}

/// **Scenario**: Each model sees its own system prompt in front of the history.
#[tokio::test]
async fn reflection_prompts_use_role_specific_system_messages() {
    let generator = Arc::new(MockLlm::with_reply("draft"));
    let critic = Arc::new(MockLlm::with_reply("critique"));
    let graph =
        build_reflection_graph(generator.clone(), critic.clone(), &EngineConfig::default())
            .unwrap();
    graph
        .invoke(MessagesState::from_human("topic"), None)
        .await
        .unwrap();

    let first_generation = &generator.prompts()[0];
    assert_eq!(first_generation[0].content, GENERATION_PROMPT);
    assert_eq!(first_generation.len(), 2);
    let first_critique = &critic.prompts()[0];
    assert_eq!(first_critique[0].content, REFLECTION_PROMPT);
    assert_eq!(first_critique.last().unwrap().content, "draft");
}

/// **Scenario**: A smaller limit ends the loop earlier.
#[tokio::test]
async fn reflection_respects_configured_limit() {
    let config = EngineConfig {
        reflection_message_limit: 2,
        ..EngineConfig::default()
    };
    let graph = build_reflection_graph(
        Arc::new(MockLlm::with_reply("draft")),
        Arc::new(MockLlm::with_reply("critique")),
        &config,
    )
    .unwrap();
    let out = graph
        .invoke(MessagesState::from_human("topic"), None)
        .await
        .unwrap();
    assert_eq!(out.messages.len(), 3);
}
