//! UseCase: ナッジの送信と取得
//!
//! ナッジは受信者ごとのキューに積まれ、取得（drain）したときに一度だけ返されます。
//! 受信者が接続中であれば送信時に `nudge` イベントも即時配信しますが、
//! キューからは削除しません。キューが空になるのはクライアントが取得したときだけです。

use std::sync::Arc;

use crate::{
    domain::{ChatRepository, MessagePushError, MessagePusher, Nudge, Username},
    infrastructure::dto::websocket::ServerEvent,
};

use super::error::ChatError;

/// ナッジ送信のユースケース
pub struct SendNudgeUseCase {
    repository: Arc<dyn ChatRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendNudgeUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(&self, from: &Username, to: &Username) -> Result<Nudge, ChatError> {
        if self.repository.find_user(to).await.is_none() {
            return Err(ChatError::NotFound(to.as_str().to_string()));
        }

        let nudge = self.repository.push_nudge(to, from).await?;
        tracing::info!("'{}' nudged '{}'", from, to);

        if !self.message_pusher.is_online(to).await {
            tracing::debug!("'{}' is offline; nudge queued", to);
            return Ok(nudge);
        }
        let payload = ServerEvent::Nudge(nudge.clone().into()).to_json();
        match self.message_pusher.push_to(to, &payload).await {
            // Disconnected in between.
            Ok(_) | Err(MessagePushError::ClientNotFound(_)) => {}
            Err(e) => tracing::warn!("Failed to push nudge to '{}': {}", to, e),
        }
        Ok(nudge)
    }
}

/// ナッジ取得のユースケース
pub struct DrainNudgesUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl DrainNudgesUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// 溜まっているナッジを全て返し、キューを空にする
    pub async fn execute(&self, username: &Username) -> Result<Vec<Nudge>, ChatError> {
        Ok(self.repository.drain_nudges(username).await?)
    }
}
