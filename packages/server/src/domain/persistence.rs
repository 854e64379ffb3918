//! Durable document backend used by the store.

use std::fmt;

use async_trait::async_trait;

use super::error::PersistenceError;

/// The four documents the chat store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    Users,
    BroadcastMessages,
    DirectMessages,
    NudgeQueues,
}

impl DocumentKey {
    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentKey::Users => "users.json",
            DocumentKey::BroadcastMessages => "messages.json",
            DocumentKey::DirectMessages => "dm_messages.json",
            DocumentKey::NudgeQueues => "nudge_queue.json",
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Key-value store of whole JSON documents.
///
/// `save` must replace the document atomically: a reader never observes a
/// partially written document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `Ok(None)` when the document does not exist yet.
    async fn load(&self, key: DocumentKey) -> Result<Option<serde_json::Value>, PersistenceError>;

    async fn save(&self, key: DocumentKey, document: serde_json::Value)
    -> Result<(), PersistenceError>;
}
