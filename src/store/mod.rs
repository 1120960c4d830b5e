//! Credential store
//!
//! Persists accounts (username, bcrypt hash, role). Username uniqueness is
//! enforced by the backing store itself, never only by a prior lookup.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, AccountSummary, Role};

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Credential store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Username '{0}' is already taken")]
    Conflict(String),

    #[error("Account not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

/// New account to insert; the hash is computed before reaching the store
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial credential update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct CredentialChanges {
    pub username: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}

impl CredentialChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.role.is_none() && self.password_hash.is_none()
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert an account; fails with `Conflict` if the username exists
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError>;

    /// Apply `changes` atomically; `NotFound` for unknown ids, `Conflict`
    /// when the new username belongs to another account
    async fn update_credentials(
        &self,
        id: i32,
        changes: CredentialChanges,
    ) -> Result<Account, StoreError>;

    /// Delete an account. Unknown ids are not an error.
    async fn delete(&self, id: i32) -> Result<(), StoreError>;

    /// All accounts ordered by id ascending
    async fn list(&self) -> Result<Vec<AccountSummary>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}
