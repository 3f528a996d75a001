//! Front-end command handlers.

mod auth;
mod chat;
mod countries;
mod help;
mod rooms;
mod theme;

pub use auth::{AuthFlow, LoginHandler, LogoutHandler, OtpHandler, PendingAuth, ResendHandler, SignupHandler};
pub use chat::{ChatFlow, ChatHandler, ImageHandler, IMAGE_REPLY};
pub use countries::CountriesHandler;
pub use help::HelpHandler;
pub use rooms::{DeleteRoomHandler, ListRoomsHandler, NewRoomHandler, SelectRoomHandler};
pub use theme::ThemeHandler;

use crate::error::AppResult;
use async_trait::async_trait;
use conversation_store::ConversationStore;
use countries_client::CountriesClient;
use gemini_client::GeminiClient;
use otp_registry::OtpRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error};

/// Session store shared by all handlers.
pub type SharedStore = Arc<RwLock<ConversationStore>>;

pub(crate) const LOGIN_REQUIRED: &str = "Please log in first. Use /login or /signup.";

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command trigger (e.g., "/help").
    fn trigger(&self) -> Option<&str> {
        None
    }

    /// Whether this is the default handler for non-command input.
    fn is_default(&self) -> bool {
        false
    }

    /// Check if this handler matches the input line.
    fn matches(&self, line: &str) -> bool {
        if let Some(trigger) = self.trigger() {
            line.split_whitespace().next() == Some(trigger)
        } else {
            self.is_default() && !line.starts_with('/')
        }
    }

    /// Execute the command and return the notification to show.
    async fn execute(&self, line: &str) -> AppResult<String>;
}

/// Text after the command word.
pub(crate) fn arguments(line: &str) -> &str {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.trim(),
        None => "",
    }
}

/// Routes input lines to the first matching handler.
pub struct Router {
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl Router {
    pub fn new(handlers: Vec<Box<dyn CommandHandler>>) -> Self {
        Self { handlers }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run one input line. Blank lines produce nothing; handler failures
    /// become a generic notification.
    pub async fn dispatch(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(handler) = self.handlers.iter().find(|h| h.matches(line)) else {
            let command = line.split_whitespace().next().unwrap_or(line);
            debug!("No handler for {}", command);
            return Some(format!(
                "Unknown command: {}. Type /help to see available commands.",
                command
            ));
        };

        match handler.execute(line).await {
            Ok(response) => Some(response),
            Err(e) => {
                error!("Handler error: {}", e);
                Some("Sorry, something went wrong.".into())
            }
        }
    }
}

/// The full handler set wired to shared components.
pub fn default_handlers(
    store: SharedStore,
    otp: OtpRegistry,
    gemini: Arc<GeminiClient>,
    countries: Arc<CountriesClient>,
    thinking_delay: Duration,
) -> Vec<Box<dyn CommandHandler>> {
    let auth = AuthFlow::new(store.clone(), otp);
    let chat = ChatFlow::new(store.clone(), gemini, thinking_delay);

    vec![
        Box::new(LoginHandler::new(auth.clone())),
        Box::new(SignupHandler::new(auth.clone())),
        Box::new(OtpHandler::new(auth.clone())),
        Box::new(ResendHandler::new(auth.clone())),
        Box::new(LogoutHandler::new(auth)),
        Box::new(NewRoomHandler::new(store.clone())),
        Box::new(ListRoomsHandler::new(store.clone())),
        Box::new(SelectRoomHandler::new(store.clone())),
        Box::new(DeleteRoomHandler::new(store.clone())),
        Box::new(ImageHandler::new(chat.clone())),
        Box::new(ChatHandler::new(chat)),
        Box::new(ThemeHandler::new(store)),
        Box::new(CountriesHandler::new(countries)),
        Box::new(HelpHandler::new()),
    ]
}
