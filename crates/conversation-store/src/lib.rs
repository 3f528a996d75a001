//! Session state for the chat front-end.
//!
//! Holds authentication, chat rooms, the current room and its displayed
//! messages. The durable subset is saved through a [`StateStorage`]
//! backend; messages never leave process memory.

pub mod date;
mod error;
mod format;
mod storage;
mod store;
mod types;

pub use error::ConversationError;
pub use format::relative_time;
pub use storage::{FileStorage, MemoryStorage, StateStorage};
pub use store::ConversationStore;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockStateStorage;
    use tokio_test::{assert_err, assert_ok};

    fn logged_in() -> ConversationStore {
        let mut store = ConversationStore::new();
        store.login(User::new("+911234567890", "+91"));
        store
    }

    #[test]
    fn test_sender_serialization() {
        assert_eq!(serde_json::to_string(&Sender::Ai).unwrap(), "\"ai\"");
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_user_serialization_camel_case() {
        let user = User::new("+911234567890", "+91").with_profile("Asha", "asha@example.com");
        let json = serde_json::to_string(&user).unwrap();

        assert!(json.contains("\"countryCode\":\"+91\""));
        assert!(json.contains("\"name\":\"Asha\""));
        assert!(json.contains("\"email\":\"asha@example.com\""));
    }

    #[test]
    fn test_login_seeds_welcome_message() {
        let store = logged_in();

        assert!(store.is_authenticated());
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].id, "welcome");
        assert_eq!(store.messages()[0].sender, Sender::Ai);
        assert!(store.messages()[0].content.starts_with("Hello! Welcome"));
    }

    #[test]
    fn test_login_welcome_uses_name() {
        let mut store = ConversationStore::new();
        store.login(User::new("+911234567890", "+91").with_profile("Asha", "asha@example.com"));

        assert!(store.messages()[0].content.starts_with("Hello Asha! Welcome"));
    }

    #[test]
    fn test_logout_clears_session_but_keeps_theme() {
        let mut store = logged_in();
        store.create_room("Trip planning");
        store.append_message("hi", Sender::User, None);
        store.toggle_dark_mode();
        store.set_loading(true);

        store.logout();

        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(store.rooms().is_empty());
        assert!(store.current_room().is_none());
        assert!(store.messages().is_empty());
        assert!(!store.is_loading());
        assert!(store.is_dark_mode());
    }

    #[test]
    fn test_create_room_prepends_and_selects() {
        let mut store = logged_in();

        let first = store.create_room("First room");
        let second = store.create_room("Second room");

        assert_eq!(store.rooms().len(), 2);
        assert_eq!(store.rooms()[0].id, second.id);
        assert_eq!(store.rooms()[1].id, first.id);
        assert_eq!(store.current_room().unwrap().id, second.id);
        assert!(store.messages().is_empty());
        assert_eq!(second.unread_count, 0);
    }

    #[test]
    fn test_append_ai_message_increments_unread() {
        let mut store = logged_in();
        let room = store.create_room("Questions");

        store.append_message("Here is an answer", Sender::Ai, None);

        let current = store.current_room().unwrap();
        assert_eq!(current.id, room.id);
        assert_eq!(current.unread_count, 1);
        assert_eq!(current.last_message.as_deref(), Some("Here is an answer"));
        assert!(current.last_message_time.is_some());
    }

    #[test]
    fn test_append_user_message_keeps_unread() {
        let mut store = logged_in();
        store.create_room("Questions");

        store.append_message("What is Rust?", Sender::User, None);

        let current = store.current_room().unwrap();
        assert_eq!(current.unread_count, 0);
        assert_eq!(current.last_message.as_deref(), Some("What is Rust?"));
        assert_eq!(store.messages().len(), 1);
    }

    #[test]
    fn test_append_only_touches_current_room() {
        let mut store = logged_in();
        let other = store.create_room("Other");
        store.create_room("Current");

        store.append_message("reply", Sender::Ai, None);

        let other = store.room(&other.id).unwrap();
        assert_eq!(other.unread_count, 0);
        assert!(other.last_message.is_none());
    }

    #[test]
    fn test_append_without_current_room() {
        let mut store = logged_in();
        store.create_room("Idle");
        store.clear_current_room();

        let message = store.append_message("orphan", Sender::Ai, Some("https://img".into()));

        assert_eq!(message.image_url.as_deref(), Some("https://img"));
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.rooms()[0].unread_count, 0);
    }

    #[test]
    fn test_delete_current_room_selects_first_remaining() {
        let mut store = logged_in();
        let a = store.create_room("Room A");
        let b = store.create_room("Room B");
        let c = store.create_room("Room C");
        store.append_message("hello", Sender::User, None);

        assert!(store.delete_room(&c.id));

        assert_eq!(store.current_room().unwrap().id, b.id);
        assert!(store.messages().is_empty());
        assert_eq!(store.rooms().len(), 2);
        assert_eq!(store.rooms()[1].id, a.id);
    }

    #[test]
    fn test_delete_last_room_clears_selection() {
        let mut store = logged_in();
        let only = store.create_room("Only room");
        store.append_message("hello", Sender::User, None);

        assert!(store.delete_room(&only.id));

        assert!(store.current_room().is_none());
        assert!(store.messages().is_empty());
        assert!(store.rooms().is_empty());
    }

    #[test]
    fn test_delete_other_room_keeps_messages() {
        let mut store = logged_in();
        let old = store.create_room("Old");
        let current = store.create_room("Current");
        store.append_message("still here", Sender::User, None);

        assert!(store.delete_room(&old.id));

        assert_eq!(store.current_room().unwrap().id, current.id);
        assert_eq!(store.messages().len(), 1);
    }

    #[test]
    fn test_delete_unknown_room() {
        let mut store = logged_in();
        store.create_room("Keep");
        assert!(!store.delete_room("missing"));
        assert_eq!(store.rooms().len(), 1);
    }

    #[test]
    fn test_select_room_clears_messages() {
        let mut store = logged_in();
        let first = store.create_room("First");
        store.create_room("Second");
        store.append_message("message in second", Sender::User, None);

        assert_ok!(store.select_room(&first.id));

        assert_eq!(store.current_room().unwrap().id, first.id);
        assert!(store.messages().is_empty());
    }

    #[test]
    fn test_select_unknown_room() {
        let mut store = logged_in();
        let err = assert_err!(store.select_room("missing"));
        assert!(matches!(err, ConversationError::RoomNotFound(_)));
    }

    #[test]
    fn test_clear_messages_keeps_rooms() {
        let mut store = logged_in();
        let room = store.create_room("General");
        store.append_message("hello", Sender::User, None);
        store.append_message("hi there", Sender::Ai, None);
        assert_eq!(store.messages().len(), 2);

        store.clear_messages();

        assert!(store.messages().is_empty());
        assert!(store.context_history().is_empty());
        let current = store.current_room().unwrap();
        assert_eq!(current.id, room.id);
        assert_eq!(current.last_message.as_deref(), Some("hi there"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_search_rooms() {
        let mut store = logged_in();
        store.create_room("Rust questions");
        store.create_room("Holiday plans");
        store.create_room("rusty bikes");

        let hits = store.search_rooms("RUST");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "rusty bikes");
        assert_eq!(store.search_rooms("  ").len(), 3);
        assert!(store.search_rooms("nothing").is_empty());
    }

    #[test]
    fn test_context_history_skips_leading_ai_turns() {
        let mut store = logged_in();
        store.append_message("Hi", Sender::User, None);
        store.append_message("Hello!", Sender::Ai, None);

        let history = store.context_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sender, Sender::User);
        assert_eq!(history[0].content, "Hi");
        assert_eq!(history[1].sender, Sender::Ai);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut store = logged_in();
        let room = store.create_room("Persisted");
        store.append_message("answer", Sender::Ai, None);
        store.toggle_dark_mode();

        let restored = ConversationStore::from_persisted(store.snapshot());

        assert!(restored.is_authenticated());
        assert_eq!(restored.current_room().unwrap().id, room.id);
        assert_eq!(restored.current_room().unwrap().unread_count, 1);
        assert!(restored.is_dark_mode());
        assert!(restored.messages().is_empty());
    }

    #[test]
    fn test_restore_drops_dangling_current_room() {
        let state = PersistedState {
            current_chat_room_id: Some("gone".into()),
            ..PersistedState::default()
        };
        let store = ConversationStore::from_persisted(state);
        assert!(store.current_room().is_none());
    }

    #[test]
    fn test_persisted_state_uses_tagged_dates() {
        let mut store = logged_in();
        store.create_room("Dated");
        store.append_message("hi", Sender::Ai, None);

        let json = serde_json::to_value(store.snapshot()).unwrap();
        let room = &json["chatRooms"][0];

        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(room["createdAt"]["__type"], "Date");
        assert_eq!(room["lastMessageTime"]["__type"], "Date");
        assert!(json.get("messages").is_none());
    }

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(assert_ok!(storage.load().await).is_none());

        let mut store = logged_in();
        store.create_room("Round trip");
        assert_ok!(store.save_to(&storage).await);

        assert!(storage.raw().await.unwrap().contains("\"__type\":\"Date\""));
        let loaded = ConversationStore::load_from(&storage).await.unwrap();
        assert_eq!(loaded.rooms(), store.rooms());

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("state.json"));

        assert!(storage.load().await.unwrap().is_none());

        let mut store = logged_in();
        store.create_room("On disk");
        store.toggle_dark_mode();
        store.save_to(&storage).await.unwrap();

        assert!(storage.path().exists());
        let loaded = ConversationStore::load_from(&storage).await.unwrap();
        assert_eq!(loaded.rooms()[0].title, "On disk");
        assert!(loaded.is_dark_mode());
        assert_eq!(loaded.user(), store.user());

        storage.clear().await.unwrap();
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_file_storage_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        let err = assert_err!(storage.load().await);
        assert!(matches!(err, ConversationError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_save_to_passes_snapshot() {
        let mut store = logged_in();
        store.create_room("Mocked");
        let expected = store.snapshot();

        let mut storage = MockStateStorage::new();
        storage
            .expect_save()
            .withf(move |state| state == &expected)
            .times(1)
            .returning(|_| Ok(()));

        assert_ok!(store.save_to(&storage).await);
    }

    #[tokio::test]
    async fn test_load_from_empty_storage() {
        let mut storage = MockStateStorage::new();
        storage.expect_load().times(1).returning(|| Ok(None));

        let store = assert_ok!(ConversationStore::load_from(&storage).await);
        assert!(!store.is_authenticated());
        assert!(store.rooms().is_empty());
    }
}
