//! Entities owned by the chat store.

use serde::{Deserialize, Serialize};

use super::value_object::{MessageText, Timestamp, Username};

/// Upper bound of the broadcast history. The oldest message is evicted first.
pub const MAX_BROADCAST_HISTORY: usize = 200;

/// Display name of server-generated broadcast messages.
pub const SYSTEM_SENDER: &str = "Server";

pub const DEFAULT_STATUS: &str = "Online";

/// Registered account.
///
/// `password_hash` is produced and checked by a [`super::CredentialHasher`];
/// the store never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: Username,
    pub password_hash: String,
    pub status: String,
    pub avatar: String,
}

impl User {
    pub fn new(
        username: Username,
        password_hash: String,
        status: Option<String>,
        avatar: Option<String>,
    ) -> Self {
        Self {
            username,
            password_hash,
            status: status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            avatar: avatar.unwrap_or_default(),
        }
    }

    pub fn view(&self) -> UserView {
        UserView {
            username: self.username.clone(),
            status: self.status.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Public profile returned by login and profile updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub username: Username,
    pub status: String,
    pub avatar: String,
}

/// Entry of the user list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub username: Username,
    pub status: String,
}

/// Message in the shared broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    /// Username of the author, or [`SYSTEM_SENDER`] when `system` is set.
    pub sender: String,
    #[serde(default)]
    pub system: bool,
    pub text: MessageText,
    pub timestamp: Timestamp,
}

impl BroadcastMessage {
    pub fn from_user(sender: &Username, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            sender: sender.as_str().to_string(),
            system: false,
            text,
            timestamp,
        }
    }

    pub fn system(text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            sender: SYSTEM_SENDER.to_string(),
            system: true,
            text,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub from: Username,
    pub to: Username,
    pub text: MessageText,
    pub timestamp: Timestamp,
}

impl DirectMessage {
    /// Whether `username` is the sender or the recipient.
    pub fn involves(&self, username: &Username) -> bool {
        &self.from == username || &self.to == username
    }
}

/// Pending attention request. The recipient is the key of the queue holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nudge {
    pub from: Username,
    pub timestamp: Timestamp,
}
