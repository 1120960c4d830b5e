//! Route definitions for the warung API

mod auth;
mod catalog;
mod user;

use axum::{routing::get, Router};

pub use auth::auth_routes;
pub use catalog::{order_routes, product_routes, stats_routes};
pub use user::user_routes;

use crate::handlers::health::health_check;
use crate::middleware;
use crate::state::AppState;

/// Full API router with the tracing and security-header layers applied
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(product_routes())
        .merge(order_routes())
        .merge(stats_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
