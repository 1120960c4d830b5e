//! Authentication middleware
//!
//! Extractors gating handlers on a verified identity token.
//!
//! Status split: a missing or malformed `Authorization` header is 401, a
//! well-formed header whose token fails verification is 403, and a valid
//! token lacking the admin role on an admin route is 403.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use crate::auth::{AuthService, Claims};
use crate::error::ApiError;
use crate::models::Role;

const BEARER_SCHEME: &str = "Bearer";

/// Why a bearer credential could not be read from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    Missing,
    Malformed,
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Missing => ApiError::Unauthorized("Token required".to_string()),
            CredentialError::Malformed => {
                ApiError::Unauthorized("Invalid authorization format".to_string())
            }
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// The value must split on single spaces into exactly two parts with the
/// scheme spelled `Bearer`. An empty token part still counts as well formed
/// and is left to fail verification.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, CredentialError> {
    let value = header.ok_or(CredentialError::Missing)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if *scheme == BEARER_SCHEME => Ok(token),
        _ => Err(CredentialError::Malformed),
    }
}

/// Authenticated user extracted from the identity token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
}

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.claims.id
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }
}

/// Extractor for authenticated users
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, user {}", user.claims.username)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A header that is not visible ASCII is treated as malformed, not missing
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| CredentialError::Malformed)?),
            None => None,
        };
        let token = parse_bearer(header)?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = auth_service.tokens().verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            ApiError::Forbidden("Invalid token".to_string())
        })?;

        Ok(AuthenticatedUser { claims })
    }
}

/// Extractor requiring the admin role
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.role().is_admin() {
            tracing::debug!(user_id = user.id(), "Admin route denied");
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminUser(user))
    }
}
