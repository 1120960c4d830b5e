//! Product, order and dashboard tests against a real Postgres database
//!
//! Each test works inside its own schema (via `search_path`) so counts are
//! exact even when tests run in parallel.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;
    use sqlx::PgPool;
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use warung_server::db::{column_exists, run_migrations};
    use warung_server::error::ApiError;
    use warung_server::models::{CreateOrderRequest, ProductRequest, Role};
    use warung_server::services::{OrderService, OrderWindow, ProductService, StatsService};
    use warung_server::store::{MemoryUserStore, NewAccount, UserStore};

    fn database_url() -> String {
        std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/warung_test".to_string())
    }

    /// Pool whose connections all resolve tables in a fresh schema
    async fn setup_schema(prefix: &str) -> (PgPool, String) {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let schema = format!("{}_{}", prefix, nanos);

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&database_url())
            .await
            .expect("Failed to connect to test database");
        sqlx::query(&format!("CREATE SCHEMA {}", schema))
            .execute(&admin)
            .await
            .unwrap();
        admin.close().await;

        let search_path = format!("SET search_path TO {}", schema);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    sqlx::query(&search_path).execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(&database_url())
            .await
            .expect("Failed to connect to test database");

        (pool, schema)
    }

    async fn migrated_schema(prefix: &str) -> (PgPool, String) {
        let (pool, schema) = setup_schema(prefix).await;
        run_migrations(&pool).await.expect("migrations");
        (pool, schema)
    }

    async fn teardown(pool: PgPool, schema: &str) {
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", schema))
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;
    }

    fn product(name: &str, price: i64) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            price,
            category: Some("minuman".to_string()),
            description: None,
        }
    }

    fn order(total: i64) -> CreateOrderRequest {
        CreateOrderRequest {
            items: json!([{"id": 1, "name": "Kopi", "qty": 1, "price": total}]),
            subtotal: total,
            fee: 0,
            total,
            payment_method: "cash".to_string(),
        }
    }

    async fn users_with(count: usize) -> Arc<dyn UserStore> {
        let store = MemoryUserStore::new();
        for i in 0..count {
            store
                .create(NewAccount {
                    username: format!("user{}", i),
                    password_hash: "$2b$04$unused".to_string(),
                    role: Role::User,
                })
                .await
                .unwrap();
        }
        Arc::new(store)
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_product_crud() {
        let (pool, schema) = migrated_schema("warung_products").await;
        let service = ProductService::new(pool.clone());

        let created = service
            .create_product(product("  Kopi Susu ", 8000))
            .await
            .unwrap();
        assert_eq!(created.name, "Kopi Susu");
        assert_eq!(created.price, 8000);

        let mut update = product("Kopi Susu Gula Aren", 12000);
        update.description = Some("less sugar".to_string());
        let updated = service.update_product(created.id, update).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.price, 12000);
        assert_eq!(updated.description.as_deref(), Some("less sugar"));

        let err = service
            .update_product(created.id + 1000, product("Teh", 3000))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = service.create_product(product("Teh", -1)).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let listed = service.list_products().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Kopi Susu Gula Aren");

        service.delete_product(created.id).await.unwrap();
        service.delete_product(created.id).await.unwrap();
        assert!(service.list_products().await.unwrap().is_empty());

        teardown(pool, &schema).await;
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_orders_newest_first() {
        let (pool, schema) = migrated_schema("warung_orders").await;
        let service = OrderService::new(pool.clone(), true);

        let mut ids = Vec::new();
        for total in [5000, 7000, 9000] {
            let created = service.create_order(order(total)).await.unwrap();
            assert!(created.created_at.is_some());
            assert_eq!(created.payment_method.as_deref(), Some("cash"));
            ids.push(created.id);
        }

        let listed = service.list_orders().await.unwrap();
        let listed_ids: Vec<i32> = listed.iter().map(|o| o.id).collect();
        ids.reverse();
        assert_eq!(listed_ids, ids);
        assert_eq!(listed[0].items.0[0]["name"], "Kopi");

        teardown(pool, &schema).await;
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_dashboard_counts_today() {
        let (pool, schema) = migrated_schema("warung_stats").await;
        assert!(column_exists(&pool, "orders", "created_at").await.unwrap());

        let products = ProductService::new(pool.clone());
        let orders = OrderService::new(pool.clone(), true);
        products.create_product(product("Kopi", 5000)).await.unwrap();
        products.create_product(product("Teh", 3000)).await.unwrap();
        orders.create_order(order(11000)).await.unwrap();
        orders.create_order(order(5000)).await.unwrap();

        // Yesterday's order stays out of the today window
        sqlx::query(
            "INSERT INTO orders (items, total, created_at) VALUES ('[]', 999, NOW() - INTERVAL '2 days')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let stats = StatsService::new(pool.clone(), users_with(3).await, OrderWindow::for_schema(true));
        let dashboard = stats.dashboard().await.unwrap();
        assert_eq!(dashboard.total_products, 2);
        assert_eq!(dashboard.total_users, 3);
        assert_eq!(dashboard.total_orders_today, 2);
        assert_eq!(dashboard.total_revenue_today, 16000);
        assert_eq!(dashboard.order_window, "today");

        teardown(pool, &schema).await;
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_untimed_orders_schema() {
        let (pool, schema) = setup_schema("warung_untimed").await;
        sqlx::query(
            r#"
            CREATE TABLE products (
                id SERIAL PRIMARY KEY, name TEXT NOT NULL, price BIGINT NOT NULL,
                category TEXT, description TEXT
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            r#"
            CREATE TABLE orders (
                id SERIAL PRIMARY KEY, items JSONB NOT NULL, subtotal BIGINT NOT NULL DEFAULT 0,
                fee BIGINT NOT NULL DEFAULT 0, total BIGINT NOT NULL DEFAULT 0, payment_method TEXT
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let timed = column_exists(&pool, "orders", "created_at").await.unwrap();
        assert!(!timed);

        let orders = OrderService::new(pool.clone(), timed);
        let first = orders.create_order(order(4000)).await.unwrap();
        let second = orders.create_order(order(6000)).await.unwrap();
        assert!(first.created_at.is_none());

        let listed: Vec<i32> = orders
            .list_orders()
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(listed, vec![second.id, first.id]);

        let stats = StatsService::new(pool.clone(), users_with(1).await, OrderWindow::for_schema(timed));
        let dashboard = stats.dashboard().await.unwrap();
        assert_eq!(dashboard.total_products, 0);
        assert_eq!(dashboard.total_orders_today, 2);
        assert_eq!(dashboard.total_revenue_today, 10000);
        assert_eq!(dashboard.order_window, "all_time");

        teardown(pool, &schema).await;
    }
}
