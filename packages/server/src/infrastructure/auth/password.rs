//! Argon2id password hashing.
//!
//! Hashing is CPU bound, so both operations run on the blocking pool.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

use crate::domain::CredentialHasher;

#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2CredentialHasher;

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &str) -> Result<String, String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| e.to_string())?
    }

    async fn verify(&self, password: &str, password_hash: &str) -> bool {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&password_hash) else {
                tracing::warn!("Stored password hash is not a valid PHC string");
                return false;
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .unwrap_or(false)
    }
}
