//! Product catalog handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{AdminUser, ApiJson};
use crate::error::ApiError;
use crate::models::{Product, ProductRequest};
use crate::services::ProductService;

/// GET /api/products (public)
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(service.list_products().await?))
}

pub async fn create_product(
    State(service): State<Arc<ProductService>>,
    _admin: AdminUser,
    ApiJson(request): ApiJson<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = service.create_product(request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(service): State<Arc<ProductService>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(service.update_product(id, request).await?))
}

pub async fn delete_product(
    State(service): State<Arc<ProductService>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
