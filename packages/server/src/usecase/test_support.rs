//! Builders shared by the use case tests.

use std::sync::Arc;

use async_trait::async_trait;
use tsunagi_shared::time::FixedClock;

use crate::{
    domain::{ChatRepository, CredentialHasher, MessageText, Username},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, persistence::InMemoryDocumentStore,
        repository::InMemoryChatRepository,
    },
};

/// Stores passwords as `plain:<password>`; fast enough for unit tests.
pub struct PlainCredentialHasher;

#[async_trait]
impl CredentialHasher for PlainCredentialHasher {
    async fn hash(&self, password: &str) -> Result<String, String> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, password_hash: &str) -> bool {
        password_hash == format!("plain:{password}")
    }
}

pub fn name(s: &str) -> Username {
    Username::new(s.to_string()).unwrap()
}

pub fn text(s: &str) -> MessageText {
    MessageText::new(s.to_string()).unwrap()
}

pub async fn create_test_repository() -> Arc<InMemoryChatRepository> {
    Arc::new(
        InMemoryChatRepository::load(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(FixedClock::new(1_672_498_800_000)),
        )
        .await
        .unwrap(),
    )
}

pub async fn create_test_repository_with_users(users: &[&str]) -> Arc<InMemoryChatRepository> {
    let repository = create_test_repository().await;
    for user in users {
        repository
            .register_user(name(user), format!("plain:{user}"), None, None)
            .await
            .unwrap();
    }
    repository
}

pub fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
    Arc::new(WebSocketMessagePusher::new())
}
