//! Pluggable persistence for [`PersistedState`].

use crate::error::ConversationError;
use crate::types::PersistedState;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Load/save seam for the durable part of the session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<PersistedState>, ConversationError>;

    async fn save(&self, state: &PersistedState) -> Result<(), ConversationError>;

    async fn clear(&self) -> Result<(), ConversationError>;
}

/// JSON file storage.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl StateStorage for FileStorage {
    async fn load(&self) -> Result<Option<PersistedState>, ConversationError> {
        if !self.path.exists() {
            info!("State file not found at {:?}, starting fresh", self.path);
            return Ok(None);
        }

        let data = fs::read_to_string(&self.path).await?;
        if data.trim().is_empty() {
            warn!("State file {:?} is empty, starting fresh", self.path);
            return Ok(None);
        }

        let state: PersistedState = serde_json::from_str(&data)?;
        info!(
            "Loaded state with {} chat rooms from {:?}",
            state.chat_rooms.len(),
            self.path
        );
        Ok(Some(state))
    }

    async fn save(&self, state: &PersistedState) -> Result<(), ConversationError> {
        let data = serde_json::to_vec_pretty(state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Write atomically using temp file + rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!("Saved state ({} bytes) to {:?}", data.len(), self.path);
        Ok(())
    }

    async fn clear(&self) -> Result<(), ConversationError> {
        if self.path.exists() {
            fs::remove_file(&self.path).await?;
        }
        Ok(())
    }
}

/// In-memory storage holding the serialized form, for tests and
/// `persist = false` runs.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw JSON last saved, if any.
    pub async fn raw(&self) -> Option<String> {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<PersistedState>, ConversationError> {
        match self.data.read().await.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<(), ConversationError> {
        let json = serde_json::to_string(state)?;
        *self.data.write().await = Some(json);
        Ok(())
    }

    async fn clear(&self) -> Result<(), ConversationError> {
        *self.data.write().await = None;
        Ok(())
    }
}
