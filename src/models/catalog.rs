//! Product catalog and order models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::types::Json;
use validator::Validate;

/// Product row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Body of `POST /api/products` and `PUT /api/products/:id`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub category: Option<String>,
    /// Older storefront clients send `desc`
    #[serde(default, alias = "desc")]
    pub description: Option<String>,
}

/// Order row; `items` is stored as JSONB
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: i32,
    pub items: Json<serde_json::Value>,
    pub subtotal: i64,
    pub fee: i64,
    pub total: i64,
    pub payment_method: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/orders`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: serde_json::Value,
    pub subtotal: i64,
    #[serde(default)]
    pub fee: i64,
    pub total: i64,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
}

/// Aggregates for the admin dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_users: i64,
    pub total_orders_today: i64,
    pub total_revenue_today: i64,
    /// Which window the order figures cover (`today` or `all_time`)
    pub order_window: &'static str,
}
