//! Server state shared by every handler.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, DrainNudgesUseCase,
    ListBroadcastsUseCase, ListDirectMessagesUseCase, ListUsersUseCase, LoginUseCase,
    RegisterUserUseCase, SendDirectMessageUseCase, SendMessageUseCase, SendNudgeUseCase,
    UpdateProfileUseCase,
};

/// Shared application state
pub struct AppState {
    /// RegisterUserUseCase（新規登録）
    pub register_user_usecase: Arc<RegisterUserUseCase>,
    /// LoginUseCase（ログイン）
    pub login_usecase: Arc<LoginUseCase>,
    /// ListUsersUseCase（ユーザー一覧）
    pub list_users_usecase: Arc<ListUsersUseCase>,
    /// UpdateProfileUseCase（プロフィール更新）
    pub update_profile_usecase: Arc<UpdateProfileUseCase>,
    /// SendMessageUseCase（ブロードキャスト送信）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// ListBroadcastsUseCase（ブロードキャスト履歴）
    pub list_broadcasts_usecase: Arc<ListBroadcastsUseCase>,
    /// SendDirectMessageUseCase（DM 送信）
    pub send_direct_message_usecase: Arc<SendDirectMessageUseCase>,
    /// ListDirectMessagesUseCase（DM 一覧）
    pub list_direct_messages_usecase: Arc<ListDirectMessagesUseCase>,
    /// SendNudgeUseCase（ナッジ送信）
    pub send_nudge_usecase: Arc<SendNudgeUseCase>,
    /// DrainNudgesUseCase（ナッジ取得）
    pub drain_nudges_usecase: Arc<DrainNudgesUseCase>,
    /// ConnectParticipantUseCase（参加者接続）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
}
