//! Gemini HTTP client.

use crate::error::GeminiError;
use crate::types::*;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Thin client for `models/{model}:generateContent`.
///
/// The API key is optional so the front-end can start without one; every
/// call then fails with [`GeminiError::ApiKeyMissing`].
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        generation: GenerationConfig,
        timeout: Duration,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::new),
            model: model.into(),
            generation,
        })
    }

    /// Get the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Single-turn generation without history.
    #[instrument(skip(self, message), fields(model = %self.model))]
    pub async fn generate(&self, message: &str) -> Result<String, GeminiError> {
        self.send(vec![Content::user(message)]).await
    }

    /// Generation with prior turns.
    ///
    /// History must open with a user turn. Otherwise, or when the API
    /// rejects the history shape, the context-free call is used instead.
    #[instrument(skip(self, message, history), fields(model = %self.model, history_len = history.len()))]
    pub async fn generate_with_context(
        &self,
        message: &str,
        history: &[Content],
    ) -> Result<String, GeminiError> {
        if let Some(first) = history.first() {
            if first.role != Some(Role::User) {
                warn!(
                    "Chat history must start with a user turn, got {:?}; sending without context",
                    first.role
                );
                return self.generate(message).await;
            }
        }

        let mut contents = history.to_vec();
        contents.push(Content::user(message));

        match self.send(contents).await {
            Err(GeminiError::InvalidHistory(reason)) => {
                warn!("History rejected ({}), falling back to a context-free call", reason);
                self.generate(message).await
            }
            other => other,
        }
    }

    async fn send(&self, contents: Vec<Content>) -> Result<String, GeminiError> {
        let api_key = self.api_key.as_ref().ok_or(GeminiError::ApiKeyMissing)?;

        let request = GenerateRequest {
            contents,
            generation_config: self.generation.clone(),
        };

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::extract_error(status.as_u16(), &body));
        }

        debug!("Response body: {}", body.chars().take(200).collect::<String>());
        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        Self::extract_text(parsed)
    }

    fn extract_text(response: GenerateResponse) -> Result<String, GeminiError> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GeminiError::SafetyBlocked(reason));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(GeminiError::EmptyResponse)?;

        let text = candidate.content.map(|c| c.text()).unwrap_or_default();
        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_default();
            return match reason.as_str() {
                "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                    Err(GeminiError::SafetyBlocked(reason.clone()))
                }
                _ => Err(GeminiError::EmptyResponse),
            };
        }

        Ok(text)
    }

    fn extract_error(status: u16, body: &str) -> GeminiError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.to_string());

        warn!(
            "Gemini API returned {}: {}",
            status,
            message.chars().take(200).collect::<String>()
        );
        GeminiError::from_status(status, message)
    }
}
