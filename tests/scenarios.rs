//! End-to-end runs of both orchestrators through the public API.

#![allow(clippy::panic)]

mod common;

use common::{ScriptedChat, StaticRetrieval, get_sources, service};
use rag_rs::chat::{ChatResponse, MessageRole};
use rag_rs::rag::NO_SOURCES_BLOCK;
use rag_rs::{Conversation, RagError, RetrievedPassage};

#[tokio::test]
async fn pipeline_resolves_follow_up_question() {
    let chat = ScriptedChat::new(vec![
        Ok(ChatResponse::text("capital of France")),
        Ok(ChatResponse::text("The capital of France is Paris [Atlas].")),
    ]);
    let retrieval = StaticRetrieval::returning(vec![RetrievedPassage::new(
        "Atlas",
        "Paris is the capital and largest city of France.",
    )]);
    let svc = service(chat.clone(), retrieval.clone(), 5);

    let mut conversation = Conversation::new();
    conversation.append_user("Tell me about France.");
    conversation.append_assistant("France is a country in Western Europe.");
    conversation.append_user("What is its capital?");

    let result = svc
        .pipeline()
        .run(&conversation)
        .await
        .unwrap_or_else(|e| panic!("{e}"));

    assert!(result.content.contains("Paris"));
    assert_eq!(
        result.execution_diagnostics.names(),
        ["rewrite", "retrieval", "assembly", "generation"]
    );
    assert_eq!(retrieval.queries(), vec!["capital of France".to_string()]);

    let final_turn = chat.requests()[1]
        .messages
        .last()
        .map(|m| m.content.clone())
        .unwrap_or_default();
    assert_eq!(
        final_turn,
        "Sources:\n\n<source><name>Atlas</name><content>Paris is the capital and largest city of France.</content></source>\n\nQuestion: What is its capital?"
    );
}

#[tokio::test]
async fn agent_looks_up_part_number() {
    let chat = ScriptedChat::new(vec![
        Ok(ChatResponse::tool_calls(vec![get_sources(
            "call_1",
            "oil filter replacement part number",
        )])),
        Ok(ChatResponse::text(
            "The replacement oil filter is PN-12345 (Owner's Manual, p.212).",
        )),
    ]);
    let retrieval = StaticRetrieval::returning(vec![RetrievedPassage::new(
        "Owner's Manual p.212",
        "Oil filter: use genuine part PN-12345.",
    )]);
    let svc = service(chat.clone(), retrieval, 5);

    let mut conversation = Conversation::new();
    conversation.append_user("What oil filter should I buy?");

    let result = svc
        .agent()
        .run(&conversation)
        .await
        .unwrap_or_else(|e| panic!("{e}"));

    assert!(result.content.contains("PN-12345"));
    let names = result.execution_diagnostics.names();
    assert_eq!(names.first().copied(), Some("tool_call"));
    assert_eq!(names.last().copied(), Some("generation"));

    let second = &chat.requests()[1].messages;
    let tool_turn = second
        .iter()
        .find(|m| m.role == MessageRole::Tool)
        .unwrap_or_else(|| panic!("no tool turn"));
    assert!(tool_turn.content.contains("<name>Owner's Manual p.212</name>"));
}

#[tokio::test]
async fn pipeline_stops_when_retrieval_is_down() {
    let chat = ScriptedChat::new(vec![
        Ok(ChatResponse::text("oil filter")),
        Ok(ChatResponse::text("should never be generated")),
    ]);
    let svc = service(chat.clone(), StaticRetrieval::failing(), 5);

    let mut conversation = Conversation::new();
    conversation.append_user("What oil filter should I buy?");

    let result = svc.pipeline().run(&conversation).await;
    assert!(matches!(result, Err(RagError::RetrievalUnavailable { .. })));
    assert_eq!(chat.calls(), 1);
}

#[tokio::test]
async fn agent_continues_when_retrieval_is_down() {
    let chat = ScriptedChat::new(vec![
        Ok(ChatResponse::tool_calls(vec![get_sources("call_1", "oil filter")])),
        Ok(ChatResponse::text("I could not find that in the manual.")),
    ]);
    let svc = service(chat.clone(), StaticRetrieval::failing(), 5);

    let mut conversation = Conversation::new();
    conversation.append_user("What oil filter should I buy?");

    let result = svc
        .agent()
        .run(&conversation)
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(result.content, "I could not find that in the manual.");
    assert!(
        chat.requests()[1]
            .messages
            .iter()
            .any(|m| m.content == NO_SOURCES_BLOCK)
    );
}

#[tokio::test]
async fn agent_gives_up_after_round_limit() {
    let chat = ScriptedChat::repeating(ChatResponse::tool_calls(vec![get_sources(
        "call_n", "more",
    )]));
    let svc = service(chat.clone(), StaticRetrieval::returning(Vec::new()), 2);

    let mut conversation = Conversation::new();
    conversation.append_user("Keep searching");

    let result = svc.agent().run(&conversation).await;
    assert!(matches!(
        result,
        Err(RagError::AgentRoundLimitExceeded { max_rounds: 2 })
    ));
    assert_eq!(chat.calls(), 2);
}

#[tokio::test]
async fn empty_conversation_rejected_by_both_modes() {
    let chat = ScriptedChat::new(Vec::new());
    let retrieval = StaticRetrieval::returning(Vec::new());
    let svc = service(chat.clone(), retrieval.clone(), 5);

    let conversation = Conversation::from_inbound([("system", "be nice")])
        .unwrap_or_else(|e| panic!("{e}"));

    assert!(matches!(
        svc.pipeline().run(&conversation).await,
        Err(RagError::EmptyConversation)
    ));
    assert!(matches!(
        svc.agent().run(&conversation).await,
        Err(RagError::EmptyConversation)
    ));
    assert_eq!(chat.calls(), 0);
    assert!(retrieval.queries().is_empty());
}
