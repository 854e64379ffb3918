//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 登録済みユーザーのみが接続できること
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みユーザーの接続
//! - 正常系：同一ユーザーの複数端末からの接続（両方とも有効）
//! - 異常系：未登録ユーザーの接続試行

use std::sync::Arc;

use crate::domain::{ChatRepository, ConnectionId, MessagePusher, PusherChannel, Username};

use super::error::ChatError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// MessagePusher（セッションレジストリ）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `username` - 接続するユーザー
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 接続成功（切断時にこの ID で登録解除する）
    /// * `Err(ChatError::NotFound)` - 未登録ユーザー
    pub async fn execute(
        &self,
        username: Username,
        sender: PusherChannel,
    ) -> Result<ConnectionId, ChatError> {
        if self.repository.find_user(&username).await.is_none() {
            return Err(ChatError::NotFound(username.into_string()));
        }
        let connection_id = self.message_pusher.register_client(username, sender).await;
        Ok(connection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{
        create_test_message_pusher, create_test_repository_with_users, name,
    };

    #[tokio::test]
    async fn test_connect_participant_success() {
        // テスト項目: 登録済みユーザーが接続でき、レジストリに登録される
        // given (前提条件):
        let repository = create_test_repository_with_users(&["alice"]).await;
        let message_pusher = create_test_message_pusher();
        let usecase = ConnectParticipantUseCase::new(repository, message_pusher.clone());

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let result = usecase.execute(name("alice"), tx).await;

        // then (期待する結果):
        let connection_id = result.unwrap();
        assert_eq!(message_pusher.lookup(&name("alice")).await, vec![connection_id]);
    }

    #[tokio::test]
    async fn test_connect_same_user_from_two_devices() {
        // テスト項目: 同じユーザーの 2 つ目の接続も受け付けられ、両方が有効
        // given (前提条件):
        let repository = create_test_repository_with_users(&["alice"]).await;
        let message_pusher = create_test_message_pusher();
        let usecase = ConnectParticipantUseCase::new(repository, message_pusher.clone());
        let (tx1, _rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, _rx2) = tokio::sync::mpsc::unbounded_channel();

        // when (操作):
        let first = usecase.execute(name("alice"), tx1).await.unwrap();
        let second = usecase.execute(name("alice"), tx2).await.unwrap();

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(
            message_pusher.lookup(&name("alice")).await,
            vec![first, second]
        );
    }

    #[tokio::test]
    async fn test_connect_unknown_user() {
        // テスト項目: 未登録ユーザーの接続は NotFound で、レジストリは変わらない
        // given (前提条件):
        let repository = create_test_repository_with_users(&[]).await;
        let message_pusher = create_test_message_pusher();
        let usecase = ConnectParticipantUseCase::new(repository, message_pusher.clone());

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let result = usecase.execute(name("ghost"), tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(ChatError::NotFound("ghost".to_string())));
        assert!(message_pusher.online_usernames().await.is_empty());
    }
}
