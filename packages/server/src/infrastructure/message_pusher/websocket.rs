//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理（セッションレジストリ）
//! - ユーザー単位の送信（push_to）と全接続への送信（broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! 同じユーザーが複数の端末から接続できるため、接続は `ConnectionId` で
//! 管理します。切断時は接続 ID で削除するので、同じユーザーの新しい接続を
//! 誤って消すことはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, Username};

struct Connection {
    username: Username,
    sender: PusherChannel,
}

#[derive(Default)]
struct Registry {
    connections: HashMap<ConnectionId, Connection>,
    /// Connections of each user, oldest first.
    by_user: HashMap<Username, Vec<ConnectionId>>,
}

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    registry: RwLock<Registry>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, username: Username, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        let mut registry = self.registry.write().await;
        registry
            .by_user
            .entry(username.clone())
            .or_default()
            .push(connection_id);
        registry.connections.insert(
            connection_id,
            Connection {
                username: username.clone(),
                sender,
            },
        );
        tracing::debug!("Connection {} of '{}' registered", connection_id, username);
        connection_id
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<Username> {
        let mut registry = self.registry.write().await;
        let connection = registry.connections.remove(connection_id)?;
        if let Some(ids) = registry.by_user.get_mut(&connection.username) {
            ids.retain(|id| id != connection_id);
            if ids.is_empty() {
                registry.by_user.remove(&connection.username);
            }
        }
        tracing::debug!(
            "Connection {} of '{}' unregistered",
            connection_id,
            connection.username
        );
        Some(connection.username)
    }

    async fn lookup(&self, username: &Username) -> Vec<ConnectionId> {
        let registry = self.registry.read().await;
        registry.by_user.get(username).cloned().unwrap_or_default()
    }

    async fn is_online(&self, username: &Username) -> bool {
        let registry = self.registry.read().await;
        registry.by_user.contains_key(username)
    }

    async fn online_usernames(&self) -> Vec<Username> {
        let registry = self.registry.read().await;
        let mut usernames: Vec<Username> = registry.by_user.keys().cloned().collect();
        usernames.sort();
        usernames
    }

    async fn push_to(&self, username: &Username, content: &str) -> Result<usize, MessagePushError> {
        let registry = self.registry.read().await;
        let ids = registry
            .by_user
            .get(username)
            .ok_or_else(|| MessagePushError::ClientNotFound(username.as_str().to_string()))?;

        let mut delivered = 0;
        let mut last_error = None;
        for id in ids {
            let Some(connection) = registry.connections.get(id) else {
                continue;
            };
            match connection.sender.send(content.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => last_error = Some(e.to_string()),
            }
        }

        match (delivered, last_error) {
            (0, Some(e)) => Err(MessagePushError::PushFailed(e)),
            _ => {
                tracing::debug!("Pushed message to {} connection(s) of '{}'", delivered, username);
                Ok(delivered)
            }
        }
    }

    async fn broadcast(&self, content: &str) -> usize {
        let registry = self.registry.read().await;
        let mut delivered = 0;
        for (id, connection) in registry.connections.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = connection.sender.send(content.to_string()) {
                tracing::warn!(
                    "Failed to push message to connection {} of '{}': {}",
                    id,
                    connection.username,
                    e
                );
            } else {
                delivered += 1;
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 接続の登録・解除（接続 ID 単位）
    // - push_to: ユーザーの全接続への送信
    // - broadcast: 全接続への送信
    //
    // 【どのようなシナリオをテストするか】
    // 1. 同一ユーザーの複数接続
    // 2. 古い接続の切断が新しい接続に影響しないこと
    // 3. 切断後の lookup が空になること
    // 4. 存在しないユーザーへの送信
    // ========================================

    fn name(s: &str) -> Username {
        Username::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_reaches_every_connection_of_user() {
        // テスト項目: 同じユーザーの全ての接続にメッセージが届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(name("alice"), tx1).await;
        pusher.register_client(name("alice"), tx2).await;

        // when (操作):
        let result = pusher.push_to(&name("alice"), "Hello").await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
        assert_eq!(rx1.recv().await, Some("Hello".to_string()));
        assert_eq!(rx2.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_removes_only_that_connection() {
        // テスト項目: 古い接続を切断しても同じユーザーの新しい接続は残る
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let old = pusher.register_client(name("alice"), tx1).await;
        let new = pusher.register_client(name("alice"), tx2).await;

        // when (操作):
        let owner = pusher.unregister_client(&old).await;
        let again = pusher.unregister_client(&old).await;

        // then (期待する結果):
        assert_eq!(owner, Some(name("alice")));
        assert_eq!(again, None);
        assert_eq!(pusher.lookup(&name("alice")).await, vec![new]);
    }

    #[tokio::test]
    async fn test_lookup_is_empty_after_disconnect() {
        // テスト項目: 最後の接続を切断すると lookup は空、送信は ClientNotFound
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = pusher.register_client(name("bob"), tx).await;

        // when (操作):
        pusher.unregister_client(&id).await;

        // then (期待する結果):
        assert!(pusher.lookup(&name("bob")).await.is_empty());
        assert!(!pusher.is_online(&name("bob")).await);
        assert!(pusher.online_usernames().await.is_empty());
        assert_eq!(
            pusher.push_to(&name("bob"), "x").await,
            Err(MessagePushError::ClientNotFound("bob".to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_channel_fails() {
        // テスト項目: 受信側が閉じた接続への送信は PushFailed になる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(name("bob"), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&name("bob"), "x").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_connections() {
        // テスト項目: ブロードキャストは閉じた接続を飛ばして残りに届ける
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        pusher.register_client(name("alice"), tx1).await;
        pusher.register_client(name("bob"), tx2).await;
        drop(rx2);

        // when (操作):
        let delivered = pusher.broadcast("Broadcast message").await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_without_connections() {
        // テスト項目: 接続が無くてもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let delivered = pusher.broadcast("Message").await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }
}
