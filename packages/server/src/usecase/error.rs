//! Errors surfaced by the use cases to the boundary layer.

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("user '{0}' already exists")]
    UserExists(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user '{0}' not found")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The change is applied in memory but not durable yet. Retrying is safe
    /// for reads; the store retries the write on its next save.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChatError::PersistenceFailure(_))
    }
}

impl From<ValueObjectError> for ChatError {
    fn from(e: ValueObjectError) -> Self {
        ChatError::InvalidInput(e.to_string())
    }
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::UserExists(name) => ChatError::UserExists(name),
            RepositoryError::InvalidCredentials => ChatError::InvalidCredentials,
            RepositoryError::UserNotFound(name) => ChatError::NotFound(name),
            RepositoryError::Persistence(e) => ChatError::PersistenceFailure(e.to_string()),
        }
    }
}
