//! HTTP API DTOs. Field names are the JSON wire format of the web client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub status: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub user: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SendDirectMessageRequest {
    pub from: String,
    pub to: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SendNudgeRequest {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub status: Option<String>,
    pub avatar: Option<String>,
}

/// `{"status": "ok"}`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OkResponse {
    pub status: String,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// `{"status": "fail", "reason": ..., "retryable": ...}`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureResponse {
    pub status: String,
    pub reason: String,
    pub retryable: bool,
}

impl FailureResponse {
    pub fn new(reason: impl Into<String>, retryable: bool) -> Self {
        Self {
            status: "fail".to_string(),
            reason: reason.into(),
            retryable,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub username: String,
    pub status: String,
    pub avatar: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub status: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummaryDto {
    pub username: String,
    pub status: String,
    /// Whether the user currently holds a live connection.
    pub online: bool,
}
