//! Domain errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username is too long (max {max}, got {actual})")]
    UsernameTooLong { max: usize, actual: usize },
    #[error("username contains invalid character {0:?}")]
    InvalidUsernameCharacter(char),
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("message is too long (max {max}, got {actual})")]
    MessageTooLong { max: usize, actual: usize },
}

/// Failure of the durable document backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("i/o error on document '{document}': {message}")]
    Io { document: String, message: String },
    #[error("malformed document '{document}': {message}")]
    Serialization { document: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("user '{0}' already exists")]
    UserExists(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user '{0}' not found")]
    UserNotFound(String),
    /// The in-memory state was updated but could not be written durably.
    /// The write is retried by the next save of the same document or by `flush`.
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("no live connection for '{0}'")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
