//! In-process credential store
//!
//! Used by the test suite and for running the server without Postgres
//! semantics in the way. Check-and-insert happens under one write lock, so
//! concurrent registrations of the same username still yield one `Conflict`.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{CredentialChanges, NewAccount, StoreError, UserStore};
use crate::models::{Account, AccountSummary};

#[derive(Default)]
struct Accounts {
    next_id: i32,
    by_id: BTreeMap<i32, Account>,
}

impl Accounts {
    fn username_taken(&self, username: &str, except: Option<i32>) -> bool {
        self.by_id
            .values()
            .any(|a| a.username == username && Some(a.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    accounts: RwLock<Accounts>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;

        if accounts.username_taken(&account.username, None) {
            return Err(StoreError::Conflict(account.username));
        }

        accounts.next_id += 1;
        let stored = Account {
            id: accounts.next_id,
            username: account.username,
            password_hash: account.password_hash,
            role: account.role,
        };
        accounts.by_id.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .by_id
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.by_id.get(&id).cloned())
    }

    async fn update_credentials(
        &self,
        id: i32,
        changes: CredentialChanges,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;

        if !accounts.by_id.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(username) = &changes.username {
            if accounts.username_taken(username, Some(id)) {
                return Err(StoreError::Conflict(username.clone()));
            }
        }

        let account = accounts.by_id.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(username) = changes.username {
            account.username = username;
        }
        if let Some(role) = changes.role {
            account.role = role;
        }
        if let Some(password_hash) = changes.password_hash {
            account.password_hash = password_hash;
        }

        Ok(account.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        self.accounts.write().await.by_id.remove(&id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AccountSummary>, StoreError> {
        // BTreeMap iterates in key order, i.e. id ascending
        Ok(self
            .accounts
            .read()
            .await
            .by_id
            .values()
            .map(Account::summary)
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.accounts.read().await.by_id.len() as i64)
    }
}
