//! Admin account management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{AdminUser, ApiJson};
use crate::auth::AuthService;
use crate::error::ApiError;
use crate::models::{AccountSummary, CreateUserRequest, UpdateUserRequest};

/// GET /api/users
pub async fn list_users(
    State(auth): State<Arc<AuthService>>,
    _admin: AdminUser,
) -> Result<Json<Vec<AccountSummary>>, ApiError> {
    Ok(Json(auth.list_users().await?))
}

/// GET /api/users/:id
pub async fn get_user(
    State(auth): State<Arc<AuthService>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<AccountSummary>, ApiError> {
    Ok(Json(auth.get_user(id).await?))
}

/// POST /api/users
pub async fn create_user(
    State(auth): State<Arc<AuthService>>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<AccountSummary>), ApiError> {
    let account = auth.create_user(req).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(auth): State<Arc<AuthService>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<AccountSummary>, ApiError> {
    Ok(Json(auth.update_user(id, req).await?))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(auth): State<Arc<AuthService>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if admin.id() == id {
        tracing::warn!(user_id = id, "Admin deleting own account");
    }
    auth.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
