//! MessagePusher trait 定義
//!
//! ライブ接続（WebSocket）の登録とメッセージ送信のインターフェース。
//! セッションレジストリの役割も兼ねます。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Username};

/// Outbound queue of one live connection. Payloads are serialized JSON events.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Registry of live connections plus delivery to them.
///
/// A user may hold several connections at once; each is registered and
/// unregistered by its own [`ConnectionId`], so closing one device never
/// evicts another.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Connected state starts here.
    async fn register_client(&self, username: Username, sender: PusherChannel) -> ConnectionId;

    /// Disconnected state is terminal. Returns the owner of the connection,
    /// or `None` if it was already gone.
    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<Username>;

    async fn lookup(&self, username: &Username) -> Vec<ConnectionId>;

    async fn is_online(&self, username: &Username) -> bool;

    async fn online_usernames(&self) -> Vec<Username>;

    /// Delivers to every connection of `username`; returns how many accepted it.
    async fn push_to(&self, username: &Username, content: &str) -> Result<usize, MessagePushError>;

    /// Delivers to every live connection. Individual failures are skipped.
    async fn broadcast(&self, content: &str) -> usize;
}
