//! Order capture service

use sqlx::types::Json;
use sqlx::PgPool;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{CreateOrderRequest, Order};

const INSERT_TIMED: &str = r#"
    INSERT INTO orders (items, subtotal, fee, total, payment_method, created_at)
    VALUES ($1, $2, $3, $4, $5, NOW())
    RETURNING id, items, subtotal, fee, total, payment_method, created_at
"#;

const INSERT_UNTIMED: &str = r#"
    INSERT INTO orders (items, subtotal, fee, total, payment_method)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, items, subtotal, fee, total, payment_method, NULL::timestamptz AS created_at
"#;

const LIST_TIMED: &str = r#"
    SELECT id, items, subtotal, fee, total, payment_method, created_at
    FROM orders
    ORDER BY created_at DESC NULLS LAST, id DESC
"#;

const LIST_UNTIMED: &str = r#"
    SELECT id, items, subtotal, fee, total, payment_method, NULL::timestamptz AS created_at
    FROM orders
    ORDER BY id DESC
"#;

/// Order capture and listing
///
/// `timed` mirrors whether `orders.created_at` exists; without it orders
/// come back with `created_at: null` and list by id.
#[derive(Clone)]
pub struct OrderService {
    db_pool: PgPool,
    timed: bool,
}

impl OrderService {
    pub fn new(db_pool: PgPool, timed: bool) -> Self {
        Self { db_pool, timed }
    }

    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, ApiError> {
        validate_order(&request)?;

        let sql = if self.timed { INSERT_TIMED } else { INSERT_UNTIMED };
        let order = sqlx::query_as::<_, Order>(sql)
            .bind(Json(&request.items))
            .bind(request.subtotal)
            .bind(request.fee)
            .bind(request.total)
            .bind(request.payment_method.trim())
            .fetch_one(&self.db_pool)
            .await?;

        tracing::info!(order_id = order.id, total = order.total, "Order captured");
        Ok(order)
    }

    /// All orders, newest first
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let sql = if self.timed { LIST_TIMED } else { LIST_UNTIMED };
        let orders = sqlx::query_as::<_, Order>(sql)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(orders)
    }
}

fn validate_order(request: &CreateOrderRequest) -> Result<(), ApiError> {
    request.validate()?;

    match request.items.as_array() {
        Some(items) if !items.is_empty() => {}
        _ => {
            return Err(ApiError::ValidationError(
                "Order must contain at least one item".to_string(),
            ))
        }
    }

    if request.subtotal < 0 || request.fee < 0 || request.total < 0 {
        return Err(ApiError::ValidationError(
            "Amounts must not be negative".to_string(),
        ));
    }

    if request.payment_method.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "Payment method is required".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> CreateOrderRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_untimed_sql_only_aliases_created_at() {
        for sql in [INSERT_UNTIMED, LIST_UNTIMED] {
            assert_eq!(sql.matches("created_at").count(), 1);
            assert!(sql.contains("NULL::timestamptz AS created_at"));
        }
    }

    #[test]
    fn test_valid_order() {
        let request = parse(json!({
            "items": [{"id": 1, "name": "Kopi", "qty": 2, "price": 5000}],
            "subtotal": 10000,
            "fee": 1000,
            "total": 11000,
            "paymentMethod": "qris"
        }));
        assert!(validate_order(&request).is_ok());
    }

    #[test]
    fn test_fee_defaults_to_zero() {
        let request = parse(json!({
            "items": [{"id": 1}],
            "subtotal": 5000,
            "total": 5000,
            "paymentMethod": "cash"
        }));
        assert_eq!(request.fee, 0);
    }

    #[test]
    fn test_rejects_empty_items_and_negative_amounts() {
        let empty = parse(json!({
            "items": [],
            "subtotal": 0,
            "total": 0,
            "paymentMethod": "cash"
        }));
        assert!(validate_order(&empty).is_err());

        let not_array = parse(json!({
            "items": {"id": 1},
            "subtotal": 0,
            "total": 0,
            "paymentMethod": "cash"
        }));
        assert!(validate_order(&not_array).is_err());

        let negative = parse(json!({
            "items": [{"id": 1}],
            "subtotal": -5,
            "total": 0,
            "paymentMethod": "cash"
        }));
        assert!(validate_order(&negative).is_err());

        let blank_method = parse(json!({
            "items": [{"id": 1}],
            "subtotal": 0,
            "total": 0,
            "paymentMethod": "  "
        }));
        assert!(validate_order(&blank_method).is_err());
    }
}
