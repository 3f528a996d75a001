//! Session store and persistence errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Chat room not found: {0}")]
    RoomNotFound(String),
}
