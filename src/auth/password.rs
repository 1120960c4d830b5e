//! Password hashing
//!
//! bcrypt with a fixed work factor. The hash string is self-describing
//! (`$2b$<cost>$<salt><digest>`) so no separate salt column is needed.
//! Hashing is CPU-bound and runs on the blocking thread pool.

use thiserror::Error;

/// Work factor used when none is configured
pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Hashing task failed: {0}")]
    TaskFailed(String),
}

/// bcrypt hasher with a fixed cost
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt
    pub async fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let cost = self.cost;
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || hash_with_cost(&plaintext, cost))
            .await
            .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
    }

    /// Check a candidate password against a stored hash
    ///
    /// Malformed hashes and task failures verify as `false`.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();

        match tokio::task::spawn_blocking(move || verify_hash(&plaintext, &hash)).await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                false
            }
        }
    }
}

fn hash_with_cost(plaintext: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash(plaintext, cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

fn verify_hash(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}
