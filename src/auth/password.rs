use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Invalid hashing parameters: {0}")]
    Params(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Password worker failed: {0}")]
    Worker(String),
}

/// argon2id hasher configured from `SecurityConfig`.
///
/// Hashing and verification run on tokio's blocking pool so a slow hash never
/// stalls the request workers.
#[derive(Clone, Debug)]
pub struct PasswordHasherConfig {
    params: Params,
    /// Same cost as real hashes; checked when a login names no account.
    decoy: Arc<str>,
}

impl PasswordHasherConfig {
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;
        let decoy = hash_with(&params, "ahiska-decoy-password")?;
        Ok(Self {
            params,
            decoy: decoy.into(),
        })
    }

    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let params = self.params.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hash_with(&params, &password))
            .await
            .map_err(|e| PasswordError::Worker(e.to_string()))?
    }

    /// A malformed stored hash counts as a mismatch.
    pub async fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        let params = self.params.clone();
        let password = password.to_owned();
        let stored = stored.to_owned();
        tokio::task::spawn_blocking(move || verify_with(&params, &password, &stored))
            .await
            .map_err(|e| PasswordError::Worker(e.to_string()))
    }

    /// Spend one verification on the decoy hash so an unknown account costs
    /// the same as a wrong password.
    pub async fn verify_decoy(&self, password: &str) -> Result<(), PasswordError> {
        let decoy = self.decoy.clone();
        self.verify(password, &decoy).await.map(|_| ())
    }
}

fn argon2(params: &Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
}

fn hash_with(params: &Params, password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2(params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

fn verify_with(params: &Params, password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => argon2(params).verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}
