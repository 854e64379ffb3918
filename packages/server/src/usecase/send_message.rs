//! UseCase: ブロードキャストメッセージの送信と履歴取得
//!
//! ## 設計ノート
//!
//! ブロードキャストの取り込み口はこのユースケースだけです（HTTP の `/send` と
//! WebSocket の `new_message` フレームの両方がここを通ります）。
//! 接続中のクライアントへの配信は Repository が発行するイベントを
//! `BroadcastFanout` が受けて行うため、このユースケースは配信を行いません。

use std::sync::Arc;

use crate::domain::{BroadcastMessage, ChatRepository, MessageText, Username};

use super::error::ChatError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者（登録の有無は問わない）
    /// * `text` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastMessage)` - 履歴に追加されたメッセージ（タイムスタンプ付き）
    /// * `Err(ChatError::PersistenceFailure)` - 履歴には追加済みだが永続化に失敗
    pub async fn execute(
        &self,
        sender: &Username,
        text: MessageText,
    ) -> Result<BroadcastMessage, ChatError> {
        let message = self.repository.append_broadcast(sender, text).await?;
        tracing::info!("Broadcast message from '{}' accepted", sender);
        Ok(message)
    }
}

/// ブロードキャスト履歴取得のユースケース
pub struct ListBroadcastsUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl ListBroadcastsUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// 古い順
    pub async fn execute(&self) -> Vec<BroadcastMessage> {
        self.repository.list_broadcasts().await
    }
}
