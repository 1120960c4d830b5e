//! Admin statistics handler

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AdminUser;
use crate::error::ApiError;
use crate::models::DashboardStats;
use crate::services::StatsService;

/// GET /api/admin/stats
pub async fn get_stats(
    State(service): State<Arc<StatsService>>,
    _admin: AdminUser,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(service.dashboard().await?))
}
