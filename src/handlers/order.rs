//! Order handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::{AdminUser, ApiJson};
use crate::error::ApiError;
use crate::models::{CreateOrderRequest, Order};
use crate::services::OrderService;

/// POST /api/orders - Checkout from the storefront (no account needed)
pub async fn create_order(
    State(service): State<Arc<OrderService>>,
    ApiJson(request): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = service.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders
pub async fn list_orders(
    State(service): State<Arc<OrderService>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(service.list_orders().await?))
}
