//! Warung Backend Server
//!
//! HTTP API for a small retail shop: account registration and login,
//! admin-only account management, product catalog, order capture and
//! dashboard statistics.

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use warung_server::auth::{AuthService, PasswordHasher, TokenIssuer};
use warung_server::config::Config;
use warung_server::db;
use warung_server::routes::create_router;
use warung_server::services::{OrderService, OrderWindow, ProductService, StatsService};
use warung_server::state::AppState;
use warung_server::store::{PgUserStore, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting warung server");

    if config.uses_development_secret() {
        tracing::warn!("JWT_SECRET not set, signing tokens with the development secret");
    }

    let db_pool = db::create_pool(&config)
        .await
        .context("database pool")?;

    if config.run_migrations {
        db::run_migrations(&db_pool).await.context("migrations")?;
    }

    // Credential store and auth core
    let user_store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db_pool.clone()));
    let auth_service = Arc::new(AuthService::new(
        user_store.clone(),
        PasswordHasher::new(config.bcrypt_cost),
        TokenIssuer::new(&config.jwt_secret, config.jwt_ttl_seconds),
    ));

    // Older deployments created `orders` without a timestamp column
    let orders_have_created_at = db::column_exists(&db_pool, "orders", "created_at")
        .await
        .context("orders schema check")?;
    if !orders_have_created_at {
        tracing::warn!("orders.created_at missing; orders are untimed and stats cover all time");
    }

    // Catalog collaborators
    let product_service = Arc::new(ProductService::new(db_pool.clone()));
    let order_service = Arc::new(OrderService::new(db_pool.clone(), orders_have_created_at));
    let stats_service = Arc::new(StatsService::new(
        db_pool.clone(),
        user_store,
        OrderWindow::for_schema(orders_have_created_at),
    ));
    tracing::info!(
        order_window = stats_service.window().as_str(),
        "Dashboard statistics configured"
    );

    let app_state = AppState::new(
        auth_service,
        product_service,
        order_service,
        stats_service,
        db_pool,
    );

    let app = create_router(app_state).layer(configure_cors(config.cors_allowed_origins.as_deref()));

    let addr = SocketAddr::new(config.host, config.port);

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let allowed_origins = allowed_origins.unwrap_or_default();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
