//! Gemini client errors and their user-facing wording.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("API key not configured")]
    ApiKeyMissing,

    #[error("API key rejected: {0}")]
    ApiKeyInvalid(String),

    #[error("Quota exceeded or rate limited: {0}")]
    QuotaExceeded(String),

    #[error("Blocked by safety filters: {0}")]
    SafetyBlocked(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Chat history rejected: {0}")]
    InvalidHistory(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty response from AI service")]
    EmptyResponse,
}

impl GeminiError {
    /// Classify a non-2xx response by status, then by the error text.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => GeminiError::ApiKeyInvalid(message),
            429 => GeminiError::QuotaExceeded(message),
            _ => Self::from_message(&message).unwrap_or(GeminiError::Api { status, message }),
        }
    }

    /// Match known failure phrases in an error message.
    pub fn from_message(message: &str) -> Option<Self> {
        let lower = message.to_lowercase();
        let owned = || message.to_string();

        if lower.contains("first content should be with role") {
            Some(GeminiError::InvalidHistory(owned()))
        } else if lower.contains("api_key") || lower.contains("api key") || lower.contains("authentication") {
            Some(GeminiError::ApiKeyInvalid(owned()))
        } else if lower.contains("quota") || lower.contains("rate limit") {
            Some(GeminiError::QuotaExceeded(owned()))
        } else if lower.contains("safety") || lower.contains("blocked") {
            Some(GeminiError::SafetyBlocked(owned()))
        } else if lower.contains("network") || lower.contains("fetch") {
            Some(GeminiError::Network(owned()))
        } else if lower.contains("timeout") || lower.contains("timed out") {
            Some(GeminiError::Timeout(owned()))
        } else {
            None
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            GeminiError::ApiKeyMissing => "API_KEY_MISSING",
            GeminiError::ApiKeyInvalid(_) => "API_KEY_INVALID",
            GeminiError::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            GeminiError::SafetyBlocked(_) => "SAFETY_BLOCKED",
            GeminiError::Network(_) => "NETWORK_ERROR",
            GeminiError::Timeout(_) => "TIMEOUT",
            GeminiError::InvalidHistory(_) => "INVALID_HISTORY",
            GeminiError::EmptyResponse => "EMPTY_RESPONSE",
            GeminiError::Api { .. } | GeminiError::Json(_) => "UNKNOWN_ERROR",
        }
    }

    /// Text shown to the user in place of an AI reply.
    pub fn user_message(&self) -> String {
        match self {
            GeminiError::ApiKeyMissing => "Gemini AI API key not configured. Set GEMINI__API_KEY in your environment or .env file.".into(),
            GeminiError::ApiKeyInvalid(_) => "Invalid Gemini AI API key. Please check your configuration. Make sure the key is correct and active.".into(),
            GeminiError::QuotaExceeded(_) => "API quota exceeded or rate limited. Please try again later.".into(),
            GeminiError::SafetyBlocked(_) => "The message was blocked for safety reasons. Please rephrase your question.".into(),
            GeminiError::Network(_) => "Network error occurred. Please check your internet connection and try again.".into(),
            GeminiError::Timeout(_) => "Request timed out. Please try again.".into(),
            GeminiError::EmptyResponse => "I apologize, but I couldn't generate a response at the moment.".into(),
            other => format!(
                "Sorry, I encountered an error while processing your request: {}. Please try again or check your API configuration.",
                other
            ),
        }
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GeminiError::Timeout(e.to_string())
        } else if e.is_connect() || e.is_request() {
            GeminiError::Network(e.to_string())
        } else if e.is_decode() {
            GeminiError::Api {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                message: e.to_string(),
            }
        } else {
            Self::from_message(&e.to_string()).unwrap_or(GeminiError::Network(e.to_string()))
        }
    }
}
