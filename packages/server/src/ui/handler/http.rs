//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    domain::{MessageText, Username},
    infrastructure::dto::{
        http::{
            LoginRequest, LoginResponse, OkResponse, RegisterRequest, SendDirectMessageRequest,
            SendMessageRequest, SendNudgeRequest, UpdateProfileRequest, UserDto, UserSummaryDto,
        },
        websocket::{BroadcastMessageDto, DirectMessageDto, NudgeDto},
    },
    ui::state::AppState,
};

use super::error::ApiError;

/// Health check endpoint
pub async fn health_check() -> Json<OkResponse> {
    Json(OkResponse::ok())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let username = Username::new(request.username)?;
    state
        .register_user_usecase
        .execute(username, &request.password, request.status, request.avatar)
        .await?;
    Ok(Json(OkResponse::ok()))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = Username::new(request.username)?;
    let view = state
        .login_usecase
        .execute(&username, &request.password)
        .await?;
    Ok(Json(LoginResponse {
        status: "ok".to_string(),
        user: view.into(),
    }))
}

/// Broadcast to everyone. Live clients receive it as a `new_message` event.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let sender = Username::new(request.user)?;
    let text = MessageText::new(request.text)?;
    state.send_message_usecase.execute(&sender, text).await?;
    Ok(Json(OkResponse::ok()))
}

pub async fn list_messages(State(state): State<Arc<AppState>>) -> Json<Vec<BroadcastMessageDto>> {
    let messages = state.list_broadcasts_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(messages.into_iter().map(Into::into).collect())
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserSummaryDto>> {
    let users = state.list_users_usecase.execute().await;
    Json(
        users
            .into_iter()
            .map(|entry| UserSummaryDto {
                username: entry.username.into_string(),
                status: entry.status,
                online: entry.online,
            })
            .collect(),
    )
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let username = Username::new(username)?;
    let view = state
        .update_profile_usecase
        .execute(&username, request.status, request.avatar)
        .await?;
    Ok(Json(view.into()))
}

pub async fn send_direct_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendDirectMessageRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let from = Username::new(request.from)?;
    let to = Username::new(request.to)?;
    let text = MessageText::new(request.text)?;
    state
        .send_direct_message_usecase
        .execute(&from, &to, text)
        .await?;
    Ok(Json(OkResponse::ok()))
}

/// Every DM the user sent or received, oldest first.
pub async fn list_direct_messages(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<DirectMessageDto>>, ApiError> {
    let username = Username::new(username)?;
    let messages = state.list_direct_messages_usecase.execute(&username).await;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

pub async fn send_nudge(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendNudgeRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let from = Username::new(request.from)?;
    let to = Username::new(request.to)?;
    state.send_nudge_usecase.execute(&from, &to).await?;
    Ok(Json(OkResponse::ok()))
}

/// Returns the pending nudges and empties the queue.
pub async fn drain_nudges(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<NudgeDto>>, ApiError> {
    let username = Username::new(username)?;
    let nudges = state.drain_nudges_usecase.execute(&username).await?;
    Ok(Json(nudges.into_iter().map(Into::into).collect()))
}
