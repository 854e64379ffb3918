//! Value objects.
//!
//! Every value object validates itself on construction, including when it is
//! deserialized from a persisted document.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Unique account name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub const MAX_LEN: usize = 32;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        let len = value.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValueObjectError::UsernameTooLong {
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        if let Some(c) = value.chars().find(|c| c.is_whitespace() || *c == '/') {
            return Err(ValueObjectError::InvalidUsernameCharacter(c));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a broadcast or direct message. Stored exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageText(String);

impl MessageText {
    pub const MAX_LEN: usize = 2000;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        let len = value.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValueObjectError::MessageTooLong {
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(value))
    }

    /// Text of the system message announcing a new account.
    pub fn joined_notice(username: &Username) -> Self {
        Self(format!("{username} joined the chat"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageText> for String {
    fn from(value: MessageText) -> Self {
        value.0
    }
}

/// Unix timestamp in milliseconds, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Identity of one live connection. A user may hold several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
