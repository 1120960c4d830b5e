//! Authentication service
//!
//! Registration, login and admin account management on top of the
//! credential store, password hasher and token issuer.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::models::{
    AccountSummary, CreateUserRequest, LoginRequest, LoginResponse, RegisterRequest, Role,
    UpdateUserRequest,
};
use crate::store::{CredentialChanges, NewAccount, StoreError, UserStore};

use super::jwt::{JwtError, TokenIssuer};
use super::password::{PasswordError, PasswordHasher};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Password error: {0}")]
    PasswordError(String),

    #[error("Token error: {0}")]
    TokenError(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(username) => AuthError::UsernameTaken(username),
            StoreError::NotFound => AuthError::UserNotFound,
            StoreError::Database(msg) => AuthError::StoreError(msg),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::PasswordError(e.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        AuthError::TokenError(e.to_string())
    }
}

/// Plaintext behind the hash that unknown-username logins are checked against
const DECOY_PASSWORD: &str = "warung-decoy-password";

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    decoy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Self-service registration
    pub async fn register(&self, req: RegisterRequest) -> Result<AccountSummary, AuthError> {
        let account = self.create_account(req).await?;
        tracing::info!(user_id = account.id, username = %account.username, role = %account.role, "Registered new account");
        Ok(account)
    }

    /// Admin-side account creation
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<AccountSummary, AuthError> {
        let account = self.create_account(req).await?;
        tracing::info!(user_id = account.id, username = %account.username, role = %account.role, "Admin created account");
        Ok(account)
    }

    async fn create_account(&self, req: RegisterRequest) -> Result<AccountSummary, AuthError> {
        let username = required_username(req.username.as_deref())?;
        let password = required_password(req.password.as_deref())?;
        let role = Role::from_input(req.role.as_deref())
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let password_hash = self.hasher.hash(password).await?;

        let account = self
            .store
            .create(NewAccount {
                username,
                password_hash,
                role,
            })
            .await?;

        Ok(account.summary())
    }

    /// Verify credentials and issue an identity token
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let (username, password) = match (req.username.as_deref(), req.password.as_deref()) {
            (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => (u.trim(), p),
            _ => {
                return Err(AuthError::Validation(
                    "Username and password are required".to_string(),
                ))
            }
        };

        let account = match self.store.find_by_username(username).await? {
            Some(account) => account,
            None => {
                tracing::debug!(username = %username, "Login for unknown username");
                // Same bcrypt work as a wrong password
                self.verify_decoy(password).await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &account.password_hash).await {
            tracing::debug!(user_id = account.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account.summary())?;
        tracing::info!(user_id = account.id, "Issued identity token");

        Ok(LoginResponse {
            token,
            role: account.role,
        })
    }

    /// List all accounts, id ascending
    pub async fn list_users(&self) -> Result<Vec<AccountSummary>, AuthError> {
        Ok(self.store.list().await?)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i32) -> Result<AccountSummary, AuthError> {
        self.store
            .find_by_id(id)
            .await?
            .map(|account| account.summary())
            .ok_or(AuthError::UserNotFound)
    }

    /// Update username, role and/or password
    pub async fn update_user(
        &self,
        id: i32,
        req: UpdateUserRequest,
    ) -> Result<AccountSummary, AuthError> {
        let username = req
            .username
            .as_deref()
            .map(|u| required_username(Some(u)))
            .transpose()?;
        let role = match req.role.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(
                value
                    .parse::<Role>()
                    .map_err(|e| AuthError::Validation(e.to_string()))?,
            ),
        };
        let password_hash = match req.password.as_deref() {
            Some(password) => Some(self.hasher.hash(required_password(Some(password))?).await?),
            None => None,
        };

        let changes = CredentialChanges {
            username,
            role,
            password_hash,
        };

        let account = if changes.is_empty() {
            self.store
                .find_by_id(id)
                .await?
                .ok_or(AuthError::UserNotFound)?
        } else {
            self.store.update_credentials(id, changes).await?
        };

        tracing::info!(user_id = account.id, username = %account.username, role = %account.role, "Updated account");
        Ok(account.summary())
    }

    /// Delete an account; unknown ids succeed
    pub async fn delete_user(&self, id: i32) -> Result<(), AuthError> {
        self.store.delete(id).await?;
        tracing::info!(user_id = id, "Deleted account");
        Ok(())
    }

    async fn verify_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| self.hasher.hash(DECOY_PASSWORD))
            .await;

        match decoy {
            Ok(hash) => {
                self.hasher.verify(password, hash).await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to prepare decoy hash"),
        }
    }

    /// Token issuer (for the access control extractors)
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

fn required_username(input: Option<&str>) -> Result<String, AuthError> {
    match input.map(str::trim) {
        Some(username) if !username.is_empty() => Ok(username.to_string()),
        _ => Err(AuthError::Validation("Username is required".to_string())),
    }
}

fn required_password(input: Option<&str>) -> Result<&str, AuthError> {
    match input {
        Some(password) if !password.is_empty() => Ok(password),
        _ => Err(AuthError::Validation("Password is required".to_string())),
    }
}
