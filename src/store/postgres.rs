//! Postgres-backed credential store

use async_trait::async_trait;
use sqlx::PgPool;

use super::{CredentialChanges, NewAccount, StoreError, UserStore};
use crate::models::{Account, AccountSummary, Role};

/// Row shape of the `users` table; `role` is plain TEXT
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    password: String,
    role: String,
}

impl TryFrom<UserRow> for Account {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| StoreError::Database(format!("user {}: {}", row.id, e)))?;

        Ok(Account {
            id: row.id,
            username: row.username,
            password_hash: row.password,
            role,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: i32,
    username: String,
    role: String,
}

/// Credential store over the `users` table
#[derive(Clone)]
pub struct PgUserStore {
    db_pool: PgPool,
}

impl PgUserStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Map a unique-violation on `users.username` to `Conflict`
    fn map_write_error(err: sqlx::Error, username: Option<&str>) -> StoreError {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(username.unwrap_or_default().to_string())
            }
            _ => StoreError::from(err),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (username, password, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, role
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| Self::map_write_error(e, Some(&account.username)))?;

        row.try_into()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, password, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, password, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn update_credentials(
        &self,
        id: i32,
        changes: CredentialChanges,
    ) -> Result<Account, StoreError> {
        // Single statement so the uniqueness check and the write cannot interleave
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                role = COALESCE($3, role),
                password = COALESCE($4, password)
            WHERE id = $1
            RETURNING id, username, password, role
            "#,
        )
        .bind(id)
        .bind(changes.username.as_deref())
        .bind(changes.role.map(|r| r.as_str()))
        .bind(changes.password_hash.as_deref())
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|e| Self::map_write_error(e, changes.username.as_deref()))?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let rows_affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            tracing::debug!(user_id = id, "Delete of unknown account ignored");
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<AccountSummary>, StoreError> {
        let rows: Vec<SummaryRow> =
            sqlx::query_as("SELECT id, username, role FROM users ORDER BY id ASC")
                .fetch_all(&self.db_pool)
                .await?;

        rows.into_iter()
            .map(|row| {
                let role = row
                    .role
                    .parse::<Role>()
                    .map_err(|e| StoreError::Database(format!("user {}: {}", row.id, e)))?;
                Ok(AccountSummary {
                    id: row.id,
                    username: row.username,
                    role,
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db_pool)
            .await?;

        Ok(count)
    }
}
