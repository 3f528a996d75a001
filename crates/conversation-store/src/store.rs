//! The session aggregate: authentication, rooms, and the displayed messages.

use crate::error::ConversationError;
use crate::storage::StateStorage;
use crate::types::*;
use tracing::{debug, info, instrument};

const WELCOME_ID: &str = "welcome";

/// Session state with synchronous transitions.
///
/// Single owner, last writer wins. Wrap it in a lock if several tasks need it.
#[derive(Debug, Default)]
pub struct ConversationStore {
    is_authenticated: bool,
    user: Option<User>,
    chat_rooms: Vec<ChatRoom>,
    current_room_id: Option<String>,
    messages: Vec<Message>,
    is_loading: bool,
    is_dark_mode: bool,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted state. Messages start empty.
    pub fn from_persisted(state: PersistedState) -> Self {
        let mut store = Self::new();
        store.restore(state);
        store
    }

    /// Load from `storage`, falling back to an empty store when nothing was saved.
    pub async fn load_from(storage: &dyn StateStorage) -> Result<Self, ConversationError> {
        Ok(storage
            .load()
            .await?
            .map(Self::from_persisted)
            .unwrap_or_default())
    }

    /// Persist the durable part of the store.
    pub async fn save_to(&self, storage: &dyn StateStorage) -> Result<(), ConversationError> {
        storage.save(&self.snapshot()).await
    }

    // Auth

    /// Mark the session authenticated and seed the welcome message.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub fn login(&mut self, user: User) {
        let greeting = match user.name.as_deref() {
            Some(name) => format!("Hello {}! ", name),
            None => "Hello! ".to_string(),
        };

        let mut welcome = Message::new(
            format!(
                "{}Welcome to Gemini AI. I'm here to help you with any questions or tasks you might have. How can I assist you today?",
                greeting
            ),
            Sender::Ai,
            None,
        );
        welcome.id = WELCOME_ID.into();

        self.is_authenticated = true;
        self.user = Some(user);
        self.messages = vec![welcome];
        info!("User logged in");
    }

    /// Drop the session. The theme preference is kept.
    pub fn logout(&mut self) {
        self.is_authenticated = false;
        self.user = None;
        self.chat_rooms.clear();
        self.current_room_id = None;
        self.messages.clear();
        self.is_loading = false;
        info!("User logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    // Rooms

    /// Create a room at the top of the list and make it current.
    pub fn create_room(&mut self, title: &str) -> ChatRoom {
        let room = ChatRoom::new(title);
        self.chat_rooms.insert(0, room.clone());
        self.current_room_id = Some(room.id.clone());
        self.messages.clear();
        debug!("Created chat room {} ({})", room.title, room.id);
        room
    }

    /// Remove a room. Deleting the current room selects the first remaining
    /// one (or none) and clears the messages. Returns false for unknown ids.
    pub fn delete_room(&mut self, id: &str) -> bool {
        let before = self.chat_rooms.len();
        self.chat_rooms.retain(|room| room.id != id);
        if self.chat_rooms.len() == before {
            return false;
        }

        if self.current_room_id.as_deref() == Some(id) {
            self.current_room_id = self.chat_rooms.first().map(|room| room.id.clone());
            self.messages.clear();
        }

        debug!("Deleted chat room {}", id);
        true
    }

    /// Make `id` the current room.
    ///
    /// Known limitation: messages are not kept per room, so the message list
    /// is cleared on every switch and the selected room starts empty.
    pub fn select_room(&mut self, id: &str) -> Result<(), ConversationError> {
        if !self.chat_rooms.iter().any(|room| room.id == id) {
            return Err(ConversationError::RoomNotFound(id.to_string()));
        }

        self.current_room_id = Some(id.to_string());
        self.messages.clear();
        Ok(())
    }

    /// Deselect the current room, leaving messages alone.
    pub fn clear_current_room(&mut self) {
        self.current_room_id = None;
    }

    pub fn rooms(&self) -> &[ChatRoom] {
        &self.chat_rooms
    }

    pub fn room(&self, id: &str) -> Option<&ChatRoom> {
        self.chat_rooms.iter().find(|room| room.id == id)
    }

    pub fn current_room(&self) -> Option<&ChatRoom> {
        self.current_room_id.as_deref().and_then(|id| self.room(id))
    }

    /// Rooms whose title contains `query`, ignoring case. Empty query matches all.
    pub fn search_rooms(&self, query: &str) -> Vec<&ChatRoom> {
        let needle = query.trim().to_lowercase();
        self.chat_rooms
            .iter()
            .filter(|room| needle.is_empty() || room.title.to_lowercase().contains(&needle))
            .collect()
    }

    // Messages

    /// Append a message and refresh the current room's summary.
    /// Only AI messages count as unread.
    pub fn append_message(
        &mut self,
        content: &str,
        sender: Sender,
        image_url: Option<String>,
    ) -> Message {
        let message = Message::new(content, sender, image_url);

        if let Some(current_id) = self.current_room_id.as_deref() {
            if let Some(room) = self.chat_rooms.iter_mut().find(|room| room.id == current_id) {
                room.last_message = Some(message.content.clone());
                room.last_message_time = Some(message.timestamp);
                if sender == Sender::Ai {
                    room.unread_count += 1;
                }
            }
        }

        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// History for a context-aware AI call. Leading AI turns (the welcome
    /// message) are skipped so the history opens with the user.
    pub fn context_history(&self) -> Vec<HistoryTurn> {
        self.messages
            .iter()
            .skip_while(|message| message.sender == Sender::Ai)
            .map(|message| HistoryTurn {
                sender: message.sender,
                content: message.content.clone(),
            })
            .collect()
    }

    // UI flags

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Flip the theme, returning the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.is_dark_mode = !self.is_dark_mode;
        self.is_dark_mode
    }

    pub fn is_dark_mode(&self) -> bool {
        self.is_dark_mode
    }

    // Persistence

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            is_authenticated: self.is_authenticated,
            user: self.user.clone(),
            chat_rooms: self.chat_rooms.clone(),
            current_chat_room_id: self.current_room_id.clone(),
            is_dark_mode: self.is_dark_mode,
        }
    }

    /// Replace the durable fields with `state`; a dangling current room id is dropped.
    pub fn restore(&mut self, state: PersistedState) {
        self.current_room_id = state
            .current_chat_room_id
            .filter(|id| state.chat_rooms.iter().any(|room| &room.id == id));
        self.is_authenticated = state.is_authenticated;
        self.user = state.user;
        self.chat_rooms = state.chat_rooms;
        self.is_dark_mode = state.is_dark_mode;
        self.messages.clear();
        self.is_loading = false;
    }
}
