//! Users, chat rooms and messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub phone: String,
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(phone: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            phone: phone.into(),
            country_code: country_code.into(),
            name: None,
            email: None,
        }
    }

    pub fn with_profile(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.email = Some(email.into());
        self
    }
}

/// A chat room and its derived summary fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub id: String,
    pub title: String,
    #[serde(with = "crate::date")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::date::option"
    )]
    pub last_message_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unread_count: u32,
}

impl ChatRoom {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            created_at: Utc::now(),
            last_message: None,
            last_message_time: None,
            unread_count: 0,
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    #[serde(with = "crate::date")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Message {
    pub fn new(content: impl Into<String>, sender: Sender, image_url: Option<String>) -> Self {
        Self {
            id: new_id(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
            image_url,
        }
    }
}

/// One role-tagged turn of chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub sender: Sender,
    pub content: String,
}

/// The part of the store that survives a restart.
///
/// Messages are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub chat_rooms: Vec<ChatRoom>,
    pub current_chat_room_id: Option<String>,
    pub is_dark_mode: bool,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
