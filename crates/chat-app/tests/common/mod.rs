//! Common test utilities for integration tests.

use chat_app::commands::{default_handlers, Router, SharedStore};
use conversation_store::ConversationStore;
use countries_client::CountriesClient;
use gemini_client::{GeminiClient, GenerationConfig};
use otp_registry::{OtpConfig, OtpRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use wiremock::MockServer;

/// Create a Gemini client configured for a mock server.
pub fn test_gemini_client(mock_server: &MockServer) -> GeminiClient {
    GeminiClient::new(
        Some("test-api-key".into()),
        mock_server.uri(),
        "test-model",
        GenerationConfig::default(),
        Duration::from_secs(5),
    )
    .unwrap()
}

/// A router wired like the binary, with the countries endpoint on the mock server.
pub fn test_router(mock_server: &MockServer) -> (Router, SharedStore) {
    let store: SharedStore = Arc::new(RwLock::new(ConversationStore::new()));
    let countries = CountriesClient::new(
        vec![format!("{}/countries", mock_server.uri())],
        Duration::from_secs(5),
    )
    .unwrap();

    let router = Router::new(default_handlers(
        store.clone(),
        OtpRegistry::new(OtpConfig::default()),
        Arc::new(test_gemini_client(mock_server)),
        Arc::new(countries),
        Duration::ZERO,
    ));
    (router, store)
}

/// Gemini success body with one text part.
pub fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

/// Pull the development code out of an OTP notification.
pub fn code_from(notification: &str) -> String {
    notification
        .split("Development code: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap()
        .to_string()
}
