//! Domain layer: value objects, entities, errors and the interfaces the
//! use cases depend on.
//!
//! Infrastructure implements the traits defined here (`ChatRepository`,
//! `DocumentStore`, `MessagePusher`, `CredentialHasher`); nothing in this
//! module depends on infrastructure.

pub mod credential;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod persistence;
pub mod repository;
pub mod value_object;

pub use credential::CredentialHasher;
pub use entity::{
    BroadcastMessage, DEFAULT_STATUS, DirectMessage, MAX_BROADCAST_HISTORY, Nudge, SYSTEM_SENDER, User,
    UserSummary, UserView,
};
pub use error::{MessagePushError, PersistenceError, RepositoryError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use persistence::{DocumentKey, DocumentStore};
pub use repository::{BroadcastPublisher, ChatRepository};
pub use value_object::{ConnectionId, MessageText, Timestamp, Username};

#[cfg(test)]
pub use credential::MockCredentialHasher;
#[cfg(test)]
pub use persistence::MockDocumentStore;
