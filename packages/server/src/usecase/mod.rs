//! UseCase 層
//!
//! 各ユースケースは Repository / MessagePusher / CredentialHasher の trait
//! オブジェクトにのみ依存します。

mod account;
mod broadcast_fanout;
mod connect_participant;
mod direct_message;
mod disconnect_participant;
mod error;
mod nudge;
mod send_message;

pub use account::{
    ListUsersUseCase, LoginUseCase, RegisterUserUseCase, UpdateProfileUseCase, UserListEntry,
};
pub use broadcast_fanout::BroadcastFanout;
pub use connect_participant::ConnectParticipantUseCase;
pub use direct_message::{ListDirectMessagesUseCase, SendDirectMessageUseCase};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::ChatError;
pub use nudge::{DrainNudgesUseCase, SendNudgeUseCase};
pub use send_message::{ListBroadcastsUseCase, SendMessageUseCase};

#[cfg(test)]
pub(crate) mod test_support;
