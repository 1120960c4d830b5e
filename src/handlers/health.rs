//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::db;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: &'static str,
    version: &'static str,
}

/// GET /health
pub async fn health_check(State(pool): State<PgPool>) -> Json<HealthResponse> {
    let (status, database) = match db::check_health(&pool).await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            ("unhealthy", "unavailable")
        }
    };

    Json(HealthResponse {
        status,
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}
