//! Admin dashboard statistics
//!
//! Whether order figures can be restricted to today depends on
//! `orders.created_at` existing. That is checked once at startup
//! (`db::column_exists`) and fixed for the life of the process.

use sqlx::PgPool;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::DashboardStats;
use crate::store::UserStore;

/// Window the order count and revenue are computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderWindow {
    Today,
    AllTime,
}

impl OrderWindow {
    /// Window available for the orders schema found at startup
    pub fn for_schema(orders_have_created_at: bool) -> Self {
        if orders_have_created_at {
            OrderWindow::Today
        } else {
            OrderWindow::AllTime
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderWindow::Today => "today",
            OrderWindow::AllTime => "all_time",
        }
    }

    fn count_sql(&self) -> &'static str {
        match self {
            OrderWindow::Today => {
                "SELECT COUNT(*) FROM orders WHERE created_at::date = CURRENT_DATE"
            }
            OrderWindow::AllTime => "SELECT COUNT(*) FROM orders",
        }
    }

    fn revenue_sql(&self) -> &'static str {
        match self {
            OrderWindow::Today => {
                "SELECT COALESCE(SUM(total), 0)::BIGINT FROM orders WHERE created_at::date = CURRENT_DATE"
            }
            OrderWindow::AllTime => "SELECT COALESCE(SUM(total), 0)::BIGINT FROM orders",
        }
    }
}

#[derive(Clone)]
pub struct StatsService {
    db_pool: PgPool,
    users: Arc<dyn UserStore>,
    window: OrderWindow,
}

impl StatsService {
    pub fn new(db_pool: PgPool, users: Arc<dyn UserStore>, window: OrderWindow) -> Self {
        Self {
            db_pool,
            users,
            window,
        }
    }

    pub fn window(&self) -> OrderWindow {
        self.window
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db_pool)
            .await?;

        let total_users = self.users.count().await?;

        let total_orders: i64 = sqlx::query_scalar(self.window.count_sql())
            .fetch_one(&self.db_pool)
            .await?;

        let total_revenue: i64 = sqlx::query_scalar(self.window.revenue_sql())
            .fetch_one(&self.db_pool)
            .await?;

        Ok(DashboardStats {
            total_products,
            total_users,
            total_orders_today: total_orders,
            total_revenue_today: total_revenue,
            order_window: self.window.as_str(),
        })
    }
}
