//! Product catalog service

use sqlx::PgPool;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{Product, ProductRequest};

#[derive(Clone)]
pub struct ProductService {
    db_pool: PgPool,
}

impl ProductService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, category, description FROM products ORDER BY id ASC",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(products)
    }

    pub async fn create_product(&self, request: ProductRequest) -> Result<Product, ApiError> {
        let request = validate_product(request)?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, category, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, category, description
            "#,
        )
        .bind(&request.name)
        .bind(request.price)
        .bind(&request.category)
        .bind(&request.description)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(product_id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: i32,
        request: ProductRequest,
    ) -> Result<Product, ApiError> {
        let request = validate_product(request)?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $1, price = $2, category = $3, description = $4
            WHERE id = $5
            RETURNING id, name, price, category, description
            "#,
        )
        .bind(&request.name)
        .bind(request.price)
        .bind(&request.category)
        .bind(&request.description)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(ApiError::NotFound("Product not found".to_string()))?;

        tracing::info!(product_id = product.id, "Product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, id: i32) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }
}

/// Trim text fields and reject empty names or negative prices
fn validate_product(mut request: ProductRequest) -> Result<ProductRequest, ApiError> {
    request.name = request.name.trim().to_string();
    request.category = non_blank(request.category);
    request.description = non_blank(request.description);

    request.validate()?;

    if request.price < 0 {
        return Err(ApiError::ValidationError(
            "Price must not be negative".to_string(),
        ));
    }

    Ok(request)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
