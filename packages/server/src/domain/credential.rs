//! Password hashing collaborator.

use async_trait::async_trait;

/// Hashes and verifies passwords. The resulting hash is opaque to the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, String>;

    /// Returns `false` for a wrong password and for an unreadable hash.
    async fn verify(&self, password: &str, password_hash: &str) -> bool;
}
