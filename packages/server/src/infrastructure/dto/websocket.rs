//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by `type`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BroadcastMessageDto {
    pub user: String,
    pub text: String,
    /// `YYYY-MM-DD HH:MM:SS` (JST)
    pub time: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub system: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectMessageDto {
    pub from: String,
    pub to: String,
    pub text: String,
    pub time: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NudgeDto {
    pub from: String,
    pub time: String,
    pub timestamp: i64,
}

/// Server → client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    NewMessage(BroadcastMessageDto),
    NewDm(DirectMessageDto),
    Nudge(NudgeDto),
}

impl ServerEvent {
    pub fn to_json(&self) -> String {
        // Plain structs of strings and integers always serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Client → server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    NewMessage { text: String },
}
