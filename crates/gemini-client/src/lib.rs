//! Minimal Gemini `generateContent` client.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::*;
