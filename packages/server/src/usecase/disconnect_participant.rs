//! UseCase: 参加者切断処理
//!
//! 切断は接続 ID 単位で行います。同じユーザーの他の接続や、
//! 実行中の Repository 操作には影響しません。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Username};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// MessagePusher（セッションレジストリ）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(Username)` - 切断した接続の持ち主
    /// * `None` - 既に切断済み
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Username> {
        let username = self.message_pusher.unregister_client(connection_id).await;
        if username.is_none() {
            tracing::debug!("Connection {} was already unregistered", connection_id);
        }
        username
    }

    /// 指定ユーザーの残りの接続数
    pub async fn count_remaining_connections(&self, username: &Username) -> usize {
        self.message_pusher.lookup(username).await.len()
    }
}
