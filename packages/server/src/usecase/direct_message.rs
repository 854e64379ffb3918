//! UseCase: ダイレクトメッセージ（DM）の送信と取得
//!
//! 送信された DM は Repository に保存した後、受信者が接続中であれば
//! `new_dm` イベントとして即時配信します。受信者がオフラインの場合は
//! 何もせず、後から `ListDirectMessagesUseCase` で取得されます。

use std::sync::Arc;

use crate::{
    domain::{ChatRepository, DirectMessage, MessagePushError, MessagePusher, MessageText, Username},
    infrastructure::dto::websocket::ServerEvent,
};

use super::error::ChatError;

/// DM 送信のユースケース
pub struct SendDirectMessageUseCase {
    repository: Arc<dyn ChatRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendDirectMessageUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// DM 送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(DirectMessage)` - 保存された DM
    /// * `Err(ChatError::NotFound)` - 受信者が未登録（送信者の登録の有無は問わない）
    /// * `Err(ChatError::PersistenceFailure)` - メモリ上は保存済みだが永続化に失敗（即時配信はしない）
    pub async fn execute(
        &self,
        from: &Username,
        to: &Username,
        text: MessageText,
    ) -> Result<DirectMessage, ChatError> {
        if self.repository.find_user(to).await.is_none() {
            return Err(ChatError::NotFound(to.as_str().to_string()));
        }

        let message = self.repository.append_dm(from, to, text).await?;

        let payload = ServerEvent::NewDm(message.clone().into()).to_json();
        self.deliver(to, &payload).await;
        if from != to {
            // The sender's other devices.
            self.deliver(from, &payload).await;
        }
        Ok(message)
    }

    async fn deliver(&self, username: &Username, payload: &str) {
        match self.message_pusher.push_to(username, payload).await {
            Ok(count) => tracing::debug!("DM pushed to {} connection(s) of '{}'", count, username),
            Err(MessagePushError::ClientNotFound(_)) => {
                tracing::debug!("'{}' is offline; DM kept for later retrieval", username)
            }
            Err(e) => tracing::warn!("Failed to push DM to '{}': {}", username, e),
        }
    }
}

/// DM 取得のユースケース
pub struct ListDirectMessagesUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl ListDirectMessagesUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// `username` が送信者または受信者である DM を送信順で返す
    pub async fn execute(&self, username: &Username) -> Vec<DirectMessage> {
        self.repository.list_dms_for(username).await
    }
}
