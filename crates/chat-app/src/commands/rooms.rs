//! Chat room commands.

use crate::commands::{arguments, CommandHandler, SharedStore, LOGIN_REQUIRED};
use crate::error::AppResult;
use crate::validation::validate_room_title;
use async_trait::async_trait;
use chrono::Utc;
use conversation_store::{relative_time, ChatRoom, ConversationStore};
use std::fmt::Write;
use tracing::info;

/// Resolve a 1-based list position or a room id.
fn resolve<'a>(store: &'a ConversationStore, selector: &str) -> Option<&'a ChatRoom> {
    if let Ok(n) = selector.parse::<usize>() {
        if n >= 1 {
            return store.rooms().get(n - 1);
        }
    }
    store.room(selector)
}

fn preview(text: &str) -> String {
    const MAX: usize = 40;
    if text.chars().count() > MAX {
        format!("{}...", text.chars().take(MAX).collect::<String>())
    } else {
        text.to_string()
    }
}

pub struct NewRoomHandler {
    store: SharedStore,
}

impl NewRoomHandler {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for NewRoomHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/new")
    }

    async fn execute(&self, line: &str) -> AppResult<String> {
        let mut store = self.store.write().await;
        if !store.is_authenticated() {
            return Ok(LOGIN_REQUIRED.into());
        }

        let title = arguments(line);
        if let Err(message) = validate_room_title(title) {
            return Ok(message.into());
        }

        let room = store.create_room(title);
        info!("Created chat room {}", room.id);
        Ok(format!("Chat room \"{}\" created successfully!", room.title))
    }
}

/// `/rooms [query]`
pub struct ListRoomsHandler {
    store: SharedStore,
}

impl ListRoomsHandler {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for ListRoomsHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/rooms")
    }

    async fn execute(&self, line: &str) -> AppResult<String> {
        let store = self.store.read().await;
        if !store.is_authenticated() {
            return Ok(LOGIN_REQUIRED.into());
        }

        let query = arguments(line);
        let matches = store.search_rooms(query);
        if matches.is_empty() {
            return Ok(if query.is_empty() {
                "No chat rooms yet. Create one with /new <title>.".into()
            } else {
                format!("No chat rooms match \"{}\".", query)
            });
        }

        let now = Utc::now();
        let current = store.current_room().map(|room| room.id.as_str());
        let mut out = String::new();

        for room in matches {
            // Positions always refer to the full list so /select works on filtered output.
            let position = store
                .rooms()
                .iter()
                .position(|r| r.id == room.id)
                .map_or(0, |i| i + 1);
            let marker = if Some(room.id.as_str()) == current { '*' } else { ' ' };
            let when = room
                .last_message_time
                .map(|t| relative_time(t, now))
                .unwrap_or_else(|| relative_time(room.created_at, now));

            let _ = write!(out, "{}{}. {} ({})", marker, position, room.title, when);
            if room.unread_count > 0 {
                let _ = write!(out, " [{} unread]", room.unread_count);
            }
            if let Some(last) = &room.last_message {
                let _ = write!(out, "\n     {}", preview(last));
            }
            out.push('\n');
        }

        Ok(out.trim_end().to_string())
    }
}

/// `/select <n|id>`
pub struct SelectRoomHandler {
    store: SharedStore,
}

impl SelectRoomHandler {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for SelectRoomHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/select")
    }

    async fn execute(&self, line: &str) -> AppResult<String> {
        let mut store = self.store.write().await;
        if !store.is_authenticated() {
            return Ok(LOGIN_REQUIRED.into());
        }

        let selector = arguments(line);
        let Some((id, title)) = resolve(&store, selector).map(|r| (r.id.clone(), r.title.clone()))
        else {
            return Ok(format!("No chat room \"{}\". Use /rooms to list them.", selector));
        };

        store.select_room(&id)?;
        Ok(format!("Switched to \"{}\".", title))
    }
}

/// `/delete <n|id>`
pub struct DeleteRoomHandler {
    store: SharedStore,
}

impl DeleteRoomHandler {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for DeleteRoomHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/delete")
    }

    async fn execute(&self, line: &str) -> AppResult<String> {
        let mut store = self.store.write().await;
        if !store.is_authenticated() {
            return Ok(LOGIN_REQUIRED.into());
        }

        let selector = arguments(line);
        let Some((id, title)) = resolve(&store, selector).map(|r| (r.id.clone(), r.title.clone()))
        else {
            return Ok(format!("No chat room \"{}\". Use /rooms to list them.", selector));
        };

        if !store.delete_room(&id) {
            return Ok("Failed to delete chat room".into());
        }
        info!("Deleted chat room {}", id);

        let mut reply = format!("Chat room \"{}\" deleted successfully!", title);
        match store.current_room() {
            Some(current) => {
                let _ = write!(reply, " Current room: \"{}\".", current.title);
            }
            None => reply.push_str(" No room selected."),
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversation_store::{Sender, User};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn logged_in() -> SharedStore {
        let mut store = ConversationStore::new();
        store.login(User::new("+15551234567", "+1"));
        Arc::new(RwLock::new(store))
    }

    #[tokio::test]
    async fn test_requires_login() {
        let store: SharedStore = Arc::new(RwLock::new(ConversationStore::new()));
        let new = NewRoomHandler::new(store.clone());
        assert_eq!(new.execute("/new General").await.unwrap(), LOGIN_REQUIRED);
        let rooms = ListRoomsHandler::new(store);
        assert_eq!(rooms.execute("/rooms").await.unwrap(), LOGIN_REQUIRED);
    }

    #[tokio::test]
    async fn test_create_validates_title() {
        let store = logged_in();
        let new = NewRoomHandler::new(store.clone());

        assert_eq!(
            new.execute("/new Hi").await.unwrap(),
            "Title must be at least 3 characters"
        );
        assert_eq!(
            new.execute("/new Trip plans").await.unwrap(),
            "Chat room \"Trip plans\" created successfully!"
        );

        let store = store.read().await;
        assert_eq!(store.rooms().len(), 1);
        assert_eq!(store.current_room().unwrap().title, "Trip plans");
    }

    #[tokio::test]
    async fn test_list_marks_current_and_unread() {
        let store = logged_in();
        {
            let mut s = store.write().await;
            s.create_room("Work");
            s.create_room("Home");
            s.append_message("Reply from the model", Sender::Ai, None);
        }

        let rooms = ListRoomsHandler::new(store.clone());
        let listing = rooms.execute("/rooms").await.unwrap();
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines[0], "*1. Home (Just now) [1 unread]");
        assert_eq!(lines[1].trim(), "Reply from the model");
        assert_eq!(lines[2], " 2. Work (Just now)");

        let filtered = rooms.execute("/rooms wo").await.unwrap();
        assert_eq!(filtered, " 2. Work (Just now)");
        assert_eq!(
            rooms.execute("/rooms zzz").await.unwrap(),
            "No chat rooms match \"zzz\"."
        );
    }

    #[tokio::test]
    async fn test_select_by_position_and_id() {
        let store = logged_in();
        let (work_id, _) = {
            let mut s = store.write().await;
            let work = s.create_room("Work");
            let home = s.create_room("Home");
            (work.id, home.id)
        };
        let select = SelectRoomHandler::new(store.clone());

        assert_eq!(select.execute("/select 2").await.unwrap(), "Switched to \"Work\".");
        assert_eq!(store.read().await.current_room().unwrap().id, work_id);

        assert_eq!(select.execute("/select 1").await.unwrap(), "Switched to \"Home\".");
        assert_eq!(
            select.execute(&format!("/select {}", work_id)).await.unwrap(),
            "Switched to \"Work\"."
        );
        assert!(select
            .execute("/select 9")
            .await
            .unwrap()
            .starts_with("No chat room \"9\""));
    }

    #[tokio::test]
    async fn test_delete_current_selects_first_remaining() {
        let store = logged_in();
        {
            let mut s = store.write().await;
            s.create_room("Work");
            s.create_room("Home");
        }
        let delete = DeleteRoomHandler::new(store.clone());

        assert_eq!(
            delete.execute("/delete 1").await.unwrap(),
            "Chat room \"Home\" deleted successfully! Current room: \"Work\"."
        );
        assert_eq!(
            delete.execute("/delete 1").await.unwrap(),
            "Chat room \"Work\" deleted successfully! No room selected."
        );
        assert!(store.read().await.rooms().is_empty());
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(45);
        assert_eq!(preview(&long), format!("{}...", "x".repeat(40)));
    }
}
