//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("OTP error: {0}")]
    Otp(#[from] otp_registry::OtpError),

    #[error("Gemini error: {0}")]
    Gemini(#[from] gemini_client::GeminiError),

    #[error("Countries error: {0}")]
    Countries(#[from] countries_client::CountriesError),

    #[error("Conversation error: {0}")]
    Conversation(#[from] conversation_store::ConversationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
