//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        drain_nudges, health_check, list_direct_messages, list_messages, list_users, login,
        register, send_direct_message, send_message, send_nudge, update_profile,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Builds the router with every HTTP and WebSocket endpoint.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/send", post(send_message))
        .route("/messages", get(list_messages))
        .route("/users", get(list_users))
        .route("/users/{username}", put(update_profile))
        .route("/dm/send", post(send_direct_message))
        .route("/dm/nudge", post(send_nudge))
        .route("/dm/nudge/{username}", get(drain_nudges))
        .route("/dm/{username}", get(list_direct_messages))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Chat relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state);
/// server.run("127.0.0.1".to_string(), 5000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws?username=<name>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
