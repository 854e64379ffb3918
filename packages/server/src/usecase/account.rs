//! UseCase: アカウント（登録・ログイン・ユーザー一覧・プロフィール更新）
//!
//! パスワードのハッシュ化と検証は CredentialHasher に委ね、
//! Repository にはハッシュ済みの文字列だけを渡します。

use std::{collections::HashSet, sync::Arc};

use crate::domain::{ChatRepository, CredentialHasher, MessagePusher, UserView, Username};

use super::error::ChatError;

/// 新規登録のユースケース
pub struct RegisterUserUseCase {
    repository: Arc<dyn ChatRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl RegisterUserUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repository, hasher }
    }

    /// 新規登録を実行
    ///
    /// 成功時は "{username} joined the chat" のシステムメッセージが
    /// ブロードキャスト履歴に追加されます。
    pub async fn execute(
        &self,
        username: Username,
        password: &str,
        status: Option<String>,
        avatar: Option<String>,
    ) -> Result<UserView, ChatError> {
        // Cheap rejection before paying for the hash.
        if self.repository.find_user(&username).await.is_some() {
            return Err(ChatError::UserExists(username.into_string()));
        }
        let password_hash = self
            .hasher
            .hash(password)
            .await
            .map_err(ChatError::Internal)?;

        Ok(self
            .repository
            .register_user(username, password_hash, status, avatar)
            .await?)
    }
}

/// ログインのユースケース
pub struct LoginUseCase {
    repository: Arc<dyn ChatRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl LoginUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repository, hasher }
    }

    pub async fn execute(&self, username: &Username, password: &str) -> Result<UserView, ChatError> {
        let view = self
            .repository
            .authenticate_user(username, password, self.hasher.as_ref())
            .await?;
        tracing::info!("User '{}' logged in", username);
        Ok(view)
    }
}

/// ユーザー一覧の 1 行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListEntry {
    pub username: Username,
    pub status: String,
    pub online: bool,
}

/// ユーザー一覧取得のユースケース
pub struct ListUsersUseCase {
    repository: Arc<dyn ChatRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ListUsersUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 登録済みユーザーをユーザー名順に返す（接続中かどうかを付与）
    pub async fn execute(&self) -> Vec<UserListEntry> {
        let online: HashSet<Username> = self
            .message_pusher
            .online_usernames()
            .await
            .into_iter()
            .collect();
        self.repository
            .list_users()
            .await
            .into_iter()
            .map(|summary| UserListEntry {
                online: online.contains(&summary.username),
                username: summary.username,
                status: summary.status,
            })
            .collect()
    }
}

/// プロフィール更新のユースケース
pub struct UpdateProfileUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl UpdateProfileUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        username: &Username,
        status: Option<String>,
        avatar: Option<String>,
    ) -> Result<UserView, ChatError> {
        Ok(self
            .repository
            .update_profile(username, status, avatar)
            .await?)
    }
}
