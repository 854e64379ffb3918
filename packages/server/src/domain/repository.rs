//! Repository trait 定義
//!
//! ユースケース層が必要とするチャットストアのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    BroadcastMessage, CredentialHasher, DirectMessage, MessageText, Nudge, RepositoryError,
    UserSummary, UserView, Username,
};

/// Ordered stream of appended broadcast messages, consumed by the fan-out task.
pub type BroadcastPublisher = mpsc::UnboundedSender<BroadcastMessage>;

/// Single source of truth for users, the broadcast history, direct messages
/// and nudge queues.
///
/// Mutations on the same collection are linearizable. Every mutating method
/// applies its change in memory first; `Err(RepositoryError::Persistence)`
/// means the change is visible but not yet durable.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Creates the account and appends the "joined the chat" system message.
    async fn register_user(
        &self,
        username: Username,
        password_hash: String,
        status: Option<String>,
        avatar: Option<String>,
    ) -> Result<UserView, RepositoryError>;

    /// Unknown user and wrong password both yield `InvalidCredentials`.
    async fn authenticate_user(
        &self,
        username: &Username,
        password: &str,
        checker: &dyn CredentialHasher,
    ) -> Result<UserView, RepositoryError>;

    async fn find_user(&self, username: &Username) -> Option<UserView>;

    async fn update_profile(
        &self,
        username: &Username,
        status: Option<String>,
        avatar: Option<String>,
    ) -> Result<UserView, RepositoryError>;

    /// Sorted by username.
    async fn list_users(&self) -> Vec<UserSummary>;

    /// Timestamps, trims the history and publishes the message, all inside
    /// one critical section.
    async fn append_broadcast(
        &self,
        sender: &Username,
        text: MessageText,
    ) -> Result<BroadcastMessage, RepositoryError>;

    /// Oldest first.
    async fn list_broadcasts(&self) -> Vec<BroadcastMessage>;

    async fn append_dm(
        &self,
        from: &Username,
        to: &Username,
        text: MessageText,
    ) -> Result<DirectMessage, RepositoryError>;

    /// DMs sent or received by `username`, in insertion order.
    async fn list_dms_for(&self, username: &Username) -> Vec<DirectMessage>;

    async fn push_nudge(&self, to: &Username, from: &Username) -> Result<Nudge, RepositoryError>;

    /// Returns the whole queue and empties it. The drained nudges are returned
    /// even if saving the emptied queue fails; the durable copy catches up on
    /// the next save or [`ChatRepository::flush`].
    async fn drain_nudges(&self, username: &Username) -> Result<Vec<Nudge>, RepositoryError>;

    /// Writes every document whose durable copy is behind memory.
    async fn flush(&self) -> Result<(), RepositoryError>;
}
