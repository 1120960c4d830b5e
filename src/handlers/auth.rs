//! Authentication HTTP handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::{ApiJson, AuthenticatedUser};
use crate::auth::AuthService;
use crate::error::ApiError;
use crate::models::{AccountSummary, LoginRequest, LoginResponse, MeResponse, RegisterRequest};

/// POST /api/register - Create an account
pub async fn register(
    State(auth): State<Arc<AuthService>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountSummary>), ApiError> {
    let account = auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /api/login - Verify credentials and issue an identity token
pub async fn login(
    State(auth): State<Arc<AuthService>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    Ok(Json(auth.login(req).await?))
}

/// GET /api/me - Claims of the presented token
pub async fn me(user: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse { user: user.claims })
}
