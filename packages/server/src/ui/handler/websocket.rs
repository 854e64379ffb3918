//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessageText, Username},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::ChatError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let username = match Username::new(query.username.clone()) {
        Ok(username) => username,
        Err(e) => {
            tracing::warn!("Invalid username '{}': {}", query.username, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();

    match state
        .connect_participant_usecase
        .execute(username.clone(), tx)
        .await
    {
        Ok(connection_id) => {
            tracing::info!("'{}' connected as {}", username, connection_id);
            let state_on_failure = state.clone();
            Ok(ws
                .on_failed_upgrade(move |e| {
                    tracing::warn!("WebSocket upgrade for {} failed: {}", connection_id, e);
                    tokio::spawn(async move {
                        state_on_failure
                            .disconnect_participant_usecase
                            .execute(&connection_id)
                            .await;
                    });
                })
                .on_upgrade(move |socket| {
                    handle_socket(socket, state, username, connection_id, rx)
                }))
        }
        Err(ChatError::NotFound(_)) => {
            tracing::warn!("Rejected connection for unknown user '{}'", username);
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            tracing::error!("Failed to connect '{}': {}", username, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns a task that forwards events from `rx` to the WebSocket sink.
///
/// Ends when the connection is unregistered (the channel closes) or the
/// socket stops accepting frames.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    username: Username,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let username_clone = username.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_client_event(&state_clone, &username_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("'{}' requested close", username_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
        .is_some()
    {
        let remaining = state
            .disconnect_participant_usecase
            .count_remaining_connections(&username)
            .await;
        tracing::info!(
            "'{}' disconnected ({}), {} connection(s) left",
            username,
            connection_id,
            remaining
        );
    }
}

/// Inbound frames take the same path as `POST /send`.
async fn handle_client_event(state: &AppState, username: &Username, raw: &str) {
    let event = match serde_json::from_str::<ClientEvent>(raw) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Ignoring malformed frame from '{}': {}", username, e);
            return;
        }
    };

    match event {
        ClientEvent::NewMessage { text } => {
            let text = match MessageText::new(text) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Ignoring invalid message from '{}': {}", username, e);
                    return;
                }
            };
            if let Err(e) = state.send_message_usecase.execute(username, text).await {
                tracing::warn!("Failed to send message from '{}': {}", username, e);
            }
        }
    }
}
