//! Product, order and dashboard routes

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::{order, product, stats};
use crate::state::AppState;

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/api/products/:id",
            put(product::update_product).delete(product::delete_product),
        )
}

pub fn order_routes() -> Router<AppState> {
    Router::new().route(
        "/api/orders",
        get(order::list_orders).post(order::create_order),
    )
}

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/api/admin/stats", get(stats::get_stats))
}
