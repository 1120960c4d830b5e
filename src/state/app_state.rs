//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::AuthService;
use crate::services::{OrderService, ProductService, StatsService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub product_service: Arc<ProductService>,
    pub order_service: Arc<OrderService>,
    pub stats_service: Arc<StatsService>,
    pub db_pool: PgPool,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        product_service: Arc<ProductService>,
        order_service: Arc<OrderService>,
        stats_service: Arc<StatsService>,
        db_pool: PgPool,
    ) -> Self {
        Self {
            auth_service,
            product_service,
            order_service,
            stats_service,
            db_pool,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<ProductService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.product_service.clone()
    }
}

impl FromRef<AppState> for Arc<OrderService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.order_service.clone()
    }
}

impl FromRef<AppState> for Arc<StatsService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.stats_service.clone()
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
