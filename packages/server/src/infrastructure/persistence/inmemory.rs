//! Process-local DocumentStore.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DocumentKey, DocumentStore, PersistenceError};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<DocumentKey, serde_json::Value>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, key: DocumentKey) -> Result<Option<serde_json::Value>, PersistenceError> {
        Ok(self.documents.lock().await.get(&key).cloned())
    }

    async fn save(
        &self,
        key: DocumentKey,
        document: serde_json::Value,
    ) -> Result<(), PersistenceError> {
        self.documents.lock().await.insert(key, document);
        Ok(())
    }
}
