use askai::config::ProviderConfig;
use askai::providers::factory::ProviderFactory;
use askai::{
    AskError, ChatMessage, ChatSession, Dispatcher, ErrorKind, MemorySettingsStore, Settings,
    SettingsStore,
};
use async_trait::async_trait;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn session_for(server: &ServerGuard) -> ChatSession {
    let mut settings = Settings {
        api_provider: "openai".to_string(),
        api_key: Some("sk-test".to_string()),
        ..Settings::default()
    };
    settings.providers.insert(
        "openai".to_string(),
        ProviderConfig {
            base_url: Some(format!("{}/v1", server.url())),
            model: None,
        },
    );
    session_with_store(Arc::new(MemorySettingsStore::new(settings)))
}

fn session_with_store(store: Arc<dyn SettingsStore>) -> ChatSession {
    let factory = ProviderFactory::with_client(reqwest::Client::new());
    ChatSession::new(Arc::new(Dispatcher::with_factory(store, factory)))
}

fn reply(content: &str) -> String {
    json!({"choices": [{"message": {"content": content}}]}).to_string()
}

fn request_body(messages: serde_json::Value) -> serde_json::Value {
    json!({
        "model": "gpt-3.5-turbo",
        "messages": messages,
        "max_tokens": 1000,
        "temperature": 0.7
    })
}

/// Never yields settings, so the dispatch can only end by timing out.
struct StalledStore;

#[async_trait]
impl SettingsStore for StalledStore {
    async fn load(&self) -> Result<Settings, AskError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn turns_are_threaded_into_the_next_request() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Json(request_body(json!([
            {"role": "user", "content": "What is ownership?"}
        ]))))
        .with_status(200)
        .with_body(reply("Each value has one owner."))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Json(request_body(json!([
            {"role": "user", "content": "What is ownership?"},
            {"role": "assistant", "content": "Each value has one owner."},
            {"role": "user", "content": "And borrowing?"}
        ]))))
        .with_status(200)
        .with_body(reply("Temporary access without taking ownership."))
        .expect(1)
        .create_async()
        .await;

    let mut session = session_for(&server);
    session.send("What is ownership?", None).await.unwrap();
    let answer = session.send("And borrowing?", None).await.unwrap();

    assert_eq!(answer, "Temporary access without taking ownership.");
    assert_eq!(session.context().len(), 4);
    assert_eq!(session.history().len(), 2);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn pending_selection_is_attached_once() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(reply("It means unchanging."))
        .create_async()
        .await;

    let mut session = session_for(&server);
    session.select("immutable");
    session.send("Define", None).await.unwrap();

    assert_eq!(session.selection(), None);
    assert_eq!(
        session.context().messages()[0],
        ChatMessage::user("Define\n\nSelected text: \"immutable\"")
    );

    let exchange = &session.history()[0];
    assert_eq!(exchange.prompt, "Define");
    assert_eq!(exchange.selected_text.as_deref(), Some("immutable"));
    assert_eq!(exchange.reply, "It means unchanging.");

    session.send("Thanks", None).await.unwrap();
    assert_eq!(session.context().messages()[2], ChatMessage::user("Thanks"));
    assert!(session.history()[1].selected_text.is_none());
}

#[tokio::test]
async fn failed_turns_are_not_recorded() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body(r#"{"error":{"message":"server exploded"}}"#)
        .create_async()
        .await;

    let mut session = session_for(&server);
    let err = session.send("hello", None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Provider);
    assert!(session.context().is_empty());
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn selection_survives_a_failed_send_and_goes_out_on_retry() {
    let mut server = Server::new_async().await;
    let unavailable = server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let mut session = session_for(&server);
    session.select("important passage");

    let err = session.send("Explain", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(session.selection(), Some("important passage"));
    unavailable.assert_async().await;
    unavailable.remove_async().await;

    let retried = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Json(request_body(json!([
            {"role": "user", "content": "Explain\n\nSelected text: \"important passage\""}
        ]))))
        .with_status(200)
        .with_body(reply("It matters."))
        .expect(1)
        .create_async()
        .await;

    assert_eq!(session.send("Explain", None).await.unwrap(), "It matters.");
    assert_eq!(session.selection(), None);
    assert_eq!(session.history()[0].selected_text.as_deref(), Some("important passage"));
    retried.assert_async().await;
}

#[tokio::test]
async fn slow_dispatch_times_out_as_transport_error() {
    let mut session =
        session_with_store(Arc::new(StalledStore)).with_timeout(Duration::from_millis(50));

    let err = session.send("hello", None).await.unwrap_err();

    assert!(matches!(err, AskError::Timeout(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());
    assert!(session.context().is_empty());
}

#[tokio::test]
async fn selection_is_kept_when_the_dispatch_times_out() {
    let mut session =
        session_with_store(Arc::new(StalledStore)).with_timeout(Duration::from_millis(50));
    session.select("pending text");

    session.send("hello", None).await.unwrap_err();

    assert_eq!(session.selection(), Some("pending text"));
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn context_window_stays_bounded_across_many_turns() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(reply("ok"))
        .expect(12)
        .create_async()
        .await;

    let mut session = session_for(&server);
    for i in 0..12 {
        session.send(&format!("question {}", i), None).await.unwrap();
    }

    assert_eq!(session.context().len(), 20);
    assert_eq!(session.context().messages()[0], ChatMessage::user("question 2"));
    assert_eq!(session.history().len(), 12);
}

#[tokio::test]
async fn clear_resets_context_but_keeps_history() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(reply("ok"))
        .create_async()
        .await;

    let mut session = session_for(&server);
    session.send("one", None).await.unwrap();
    session.select("leftover");
    session.clear();

    assert!(session.context().is_empty());
    assert_eq!(session.selection(), None);
    assert_eq!(session.history().len(), 1);
}
