//! Authentication request/response models

use serde::{Deserialize, Serialize};

use super::Role;
use crate::auth::Claims;

/// Body of `POST /api/register` and `POST /api/users`
///
/// Fields are optional at the wire level so that missing values surface as
/// validation errors (400) instead of body rejections.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Admin-side account creation takes the same shape as self registration
pub type CreateUserRequest = RegisterRequest;

/// Body of `POST /api/login`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

/// Body of `GET /api/me`
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user: Claims,
}

/// Body of `PUT /api/users/:id`; absent fields are left unchanged
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}
