//! Chat command - sends messages to Gemini with room context.

use crate::commands::{arguments, CommandHandler, SharedStore, LOGIN_REQUIRED};
use crate::error::AppResult;
use async_trait::async_trait;
use conversation_store::{HistoryTurn, Sender};
use gemini_client::{Content, GeminiClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Canned reply for messages that carry only an image.
pub const IMAGE_REPLY: &str = "I can see you've shared an image! While I can't process images in this demo, I'd be happy to help you with any questions or tasks you might have. What would you like to discuss?";

const NO_ROOM: &str = "No chat room selected. Use /new <title> or /select <n>.";

/// Shared send path for text and image messages.
#[derive(Clone)]
pub struct ChatFlow {
    store: SharedStore,
    gemini: Arc<GeminiClient>,
    /// Pause with the loading flag set before the AI is asked.
    thinking_delay: Duration,
}

impl ChatFlow {
    pub fn new(store: SharedStore, gemini: Arc<GeminiClient>, thinking_delay: Duration) -> Self {
        Self {
            store,
            gemini,
            thinking_delay,
        }
    }

    /// Append the user's message, ask Gemini, append the reply.
    ///
    /// The store reports loading from the user's message until the reply
    /// lands, including the thinking delay.
    ///
    /// AI failures are answered in-chat with the error's user message.
    #[instrument(skip(self, text, image_url), fields(has_image = image_url.is_some()))]
    pub async fn send(&self, text: &str, image_url: Option<String>) -> AppResult<String> {
        let text = text.trim();

        let history = {
            let mut store = self.store.write().await;
            if !store.is_authenticated() {
                return Ok(LOGIN_REQUIRED.into());
            }
            if store.current_room().is_none() {
                return Ok(NO_ROOM.into());
            }

            let history = store.context_history();
            let content = if text.is_empty() { "Image shared" } else { text };
            store.append_message(content, Sender::User, image_url);
            store.set_loading(true);
            history
        };

        if !self.thinking_delay.is_zero() {
            debug!("Thinking for {:?}", self.thinking_delay);
            tokio::time::sleep(self.thinking_delay).await;
        }

        let reply = if text.is_empty() {
            IMAGE_REPLY.to_string()
        } else {
            let contents: Vec<Content> = history.iter().map(to_content).collect();
            match self.gemini.generate_with_context(text, &contents).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Gemini error ({}): {}", e.code(), e);
                    e.user_message()
                }
            }
        };

        let mut store = self.store.write().await;
        store.append_message(&reply, Sender::Ai, None);
        store.set_loading(false);
        info!("Reply appended: {} chars", reply.len());

        Ok(format!("Gemini: {}", reply))
    }
}

fn to_content(turn: &HistoryTurn) -> Content {
    match turn.sender {
        Sender::User => Content::user(turn.content.as_str()),
        Sender::Ai => Content::model(turn.content.as_str()),
    }
}

pub struct ChatHandler {
    flow: ChatFlow,
}

impl ChatHandler {
    pub fn new(flow: ChatFlow) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl CommandHandler for ChatHandler {
    fn is_default(&self) -> bool {
        true
    }

    async fn execute(&self, line: &str) -> AppResult<String> {
        self.flow.send(line, None).await
    }
}

/// `/image <url> [caption]`
pub struct ImageHandler {
    flow: ChatFlow,
}

impl ImageHandler {
    pub fn new(flow: ChatFlow) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl CommandHandler for ImageHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/image")
    }

    async fn execute(&self, line: &str) -> AppResult<String> {
        let args = arguments(line);
        let (url, caption) = match args.split_once(char::is_whitespace) {
            Some((url, caption)) => (url, caption.trim()),
            None => (args, ""),
        };

        if url.is_empty() {
            return Ok("Usage: /image <url> [caption]".into());
        }

        self.flow.send(caption, Some(url.to_string())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversation_store::{ConversationStore, User};
    use gemini_client::GenerationConfig;
    use std::time::Duration;
    use tokio::sync::RwLock;

    fn unconfigured_flow() -> ChatFlow {
        let gemini = GeminiClient::new(
            None,
            "http://127.0.0.1:9",
            "test-model",
            GenerationConfig::default(),
            Duration::from_secs(1),
        )
        .unwrap();
        ChatFlow::new(
            Arc::new(RwLock::new(ConversationStore::new())),
            Arc::new(gemini),
            Duration::ZERO,
        )
    }

    async fn with_room(flow: &ChatFlow) {
        let mut store = flow.store.write().await;
        store.login(User::new("+15551234567", "+1"));
        store.create_room("General");
    }

    #[tokio::test]
    async fn test_requires_login_and_room() {
        let flow = unconfigured_flow();
        assert_eq!(flow.send("hi", None).await.unwrap(), LOGIN_REQUIRED);

        flow.store
            .write()
            .await
            .login(User::new("+15551234567", "+1"));
        assert_eq!(flow.send("hi", None).await.unwrap(), NO_ROOM);
    }

    #[tokio::test]
    async fn test_missing_key_answers_in_chat() {
        let flow = unconfigured_flow();
        with_room(&flow).await;

        let reply = flow.send("hello", None).await.unwrap();
        assert!(reply.starts_with("Gemini: Gemini AI API key not configured."));

        let store = flow.store.read().await;
        assert_eq!(store.messages().len(), 2);
        assert_eq!(store.messages()[0].sender, Sender::User);
        assert_eq!(store.messages()[1].sender, Sender::Ai);
        assert!(!store.is_loading());
        assert_eq!(store.current_room().unwrap().unread_count, 1);
    }

    #[tokio::test]
    async fn test_loading_while_thinking() {
        let mut flow = unconfigured_flow();
        flow.thinking_delay = Duration::from_millis(300);
        with_room(&flow).await;

        let sending = tokio::spawn({
            let flow = flow.clone();
            async move { flow.send("hello", None).await }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        {
            let store = flow.store.read().await;
            assert!(store.is_loading());
            assert_eq!(store.messages().len(), 1);
            assert_eq!(store.messages()[0].content, "hello");
        }

        let reply = sending.await.unwrap().unwrap();
        assert!(reply.starts_with("Gemini: "));
        let store = flow.store.read().await;
        assert!(!store.is_loading());
        assert_eq!(store.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_image_only_gets_canned_reply() {
        let flow = unconfigured_flow();
        with_room(&flow).await;
        let handler = ImageHandler::new(flow.clone());

        let reply = handler
            .execute("/image https://picsum.photos/300/200")
            .await
            .unwrap();
        assert_eq!(reply, format!("Gemini: {}", IMAGE_REPLY));

        let store = flow.store.read().await;
        let shared = &store.messages()[0];
        assert_eq!(shared.content, "Image shared");
        assert_eq!(shared.image_url.as_deref(), Some("https://picsum.photos/300/200"));
    }

    #[tokio::test]
    async fn test_image_usage() {
        let handler = ImageHandler::new(unconfigured_flow());
        assert_eq!(
            handler.execute("/image").await.unwrap(),
            "Usage: /image <url> [caption]"
        );
    }

    #[test]
    fn test_history_roles() {
        let turn = HistoryTurn {
            sender: Sender::Ai,
            content: "hi".into(),
        };
        assert_eq!(to_content(&turn), Content::model("hi"));
    }
}
