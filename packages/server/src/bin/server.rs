//! Tsunagi chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsunagi-server
//! cargo run --bin tsunagi-server -- --host 0.0.0.0 --port 3000 --data-dir /var/lib/tsunagi
//! cargo run --bin tsunagi-server -- --ephemeral
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tokio::sync::mpsc;
use tsunagi_server::{
    domain::{ChatRepository, CredentialHasher, DocumentStore, MessagePusher},
    infrastructure::{
        auth::Argon2CredentialHasher,
        message_pusher::WebSocketMessagePusher,
        persistence::{InMemoryDocumentStore, JsonFileDocumentStore},
        repository::InMemoryChatRepository,
    },
    ui::{Server, state::AppState},
    usecase::{
        BroadcastFanout, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        DrainNudgesUseCase, ListBroadcastsUseCase, ListDirectMessagesUseCase, ListUsersUseCase,
        LoginUseCase, RegisterUserUseCase, SendDirectMessageUseCase, SendMessageUseCase,
        SendNudgeUseCase, UpdateProfileUseCase,
    },
};
use tsunagi_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tsunagi-server")]
#[command(about = "Chat relay server with broadcast, direct messages and nudges", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "TSUNAGI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "TSUNAGI_PORT", default_value = "5000")]
    port: u16,

    /// Directory holding users.json, messages.json, dm_messages.json and nudge_queue.json
    #[arg(short = 'd', long, env = "TSUNAGI_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long, env = "TSUNAGI_EPHEMERAL")]
    ephemeral: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "TSUNAGI_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. DocumentStore
    // 2. Repository
    // 3. MessagePusher + BroadcastFanout
    // 4. UseCases
    // 5. Server

    // 1. Create DocumentStore
    let store: Arc<dyn DocumentStore> = if args.ephemeral {
        tracing::warn!("Running with in-memory persistence; data is lost on exit");
        Arc::new(InMemoryDocumentStore::new())
    } else {
        match JsonFileDocumentStore::open(&args.data_dir).await {
            Ok(store) => {
                tracing::info!("Persisting to {}", store.dir().display());
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!("Failed to open data directory: {}", e);
                std::process::exit(1);
            }
        }
    };

    // 2. Create Repository
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();
    let repository: Arc<dyn ChatRepository> =
        match InMemoryChatRepository::load(store, Arc::new(SystemClock)).await {
            Ok(repository) => Arc::new(repository.with_broadcast_publisher(broadcast_tx)),
            Err(e) => {
                tracing::error!("Failed to load chat store: {}", e);
                std::process::exit(1);
            }
        };

    // 3. Create MessagePusher (WebSocket implementation) and start the fan-out
    let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());
    let fanout = BroadcastFanout::new(message_pusher.clone()).spawn(broadcast_rx);

    // 4. Create UseCases
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2CredentialHasher::new());
    let state = AppState {
        register_user_usecase: Arc::new(RegisterUserUseCase::new(
            repository.clone(),
            hasher.clone(),
        )),
        login_usecase: Arc::new(LoginUseCase::new(repository.clone(), hasher)),
        list_users_usecase: Arc::new(ListUsersUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        update_profile_usecase: Arc::new(UpdateProfileUseCase::new(repository.clone())),
        send_message_usecase: Arc::new(SendMessageUseCase::new(repository.clone())),
        list_broadcasts_usecase: Arc::new(ListBroadcastsUseCase::new(repository.clone())),
        send_direct_message_usecase: Arc::new(SendDirectMessageUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        list_direct_messages_usecase: Arc::new(ListDirectMessagesUseCase::new(
            repository.clone(),
        )),
        send_nudge_usecase: Arc::new(SendNudgeUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        drain_nudges_usecase: Arc::new(DrainNudgesUseCase::new(repository.clone())),
        connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
            message_pusher,
        )),
    };

    // 5. Create and run the server
    let server = Server::new(state);
    let result = server.run(args.host, args.port).await;

    // Retry any write that failed while serving.
    if let Err(e) = repository.flush().await {
        tracing::error!("Final flush failed: {}", e);
    }
    fanout.abort();

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
