//! Dark mode toggle.

use crate::commands::{CommandHandler, SharedStore};
use crate::error::AppResult;
use async_trait::async_trait;

pub struct ThemeHandler {
    store: SharedStore,
}

impl ThemeHandler {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for ThemeHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/dark")
    }

    async fn execute(&self, _line: &str) -> AppResult<String> {
        let dark = self.store.write().await.toggle_dark_mode();
        Ok(if dark {
            "Dark mode enabled.".into()
        } else {
            "Light mode enabled.".into()
        })
    }
}
