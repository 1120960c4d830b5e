//! Test utilities and common setup.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

use warung_server::auth::{
    AuthService, PasswordHasher, TokenIssuer, DEFAULT_TOKEN_TTL_SECONDS, MIN_BCRYPT_COST,
};
use warung_server::routes::create_router;
use warung_server::services::{OrderService, OrderWindow, ProductService, StatsService};
use warung_server::state::AppState;
use warung_server::store::{MemoryUserStore, UserStore};

pub const TEST_SECRET: &str = "test-secret-for-integration-tests";

pub struct TestApp {
    pub router: Router,
    pub auth: Arc<AuthService>,
}

/// Router over an in-memory credential store.
///
/// The Postgres pool is lazy and never connected: only catalog handlers
/// would touch it, and these tests stop at the access gate for them.
pub fn test_app() -> TestApp {
    let db_pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/warung_unused")
        .expect("lazy pool");

    let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let auth = Arc::new(AuthService::new(
        store.clone(),
        PasswordHasher::new(MIN_BCRYPT_COST),
        TokenIssuer::new(TEST_SECRET, DEFAULT_TOKEN_TTL_SECONDS),
    ));

    let state = AppState::new(
        auth.clone(),
        Arc::new(ProductService::new(db_pool.clone())),
        Arc::new(OrderService::new(db_pool.clone(), true)),
        Arc::new(StatsService::new(db_pool.clone(), store, OrderWindow::Today)),
        db_pool,
    );

    TestApp {
        router: create_router(state),
        auth,
    }
}

impl TestApp {
    /// Send a request, returning status and parsed JSON body (`Null` if empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri).method(method);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.dispatch(request).await
    }

    /// Send a raw body, with an optional content type
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri).method(method);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        if let Some(value) = content_type {
            builder = builder.header(header::CONTENT_TYPE, value);
        }

        self.dispatch(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn register(&self, username: &str, password: &str, role: Option<&str>) -> Value {
        let mut body = serde_json::json!({ "username": username, "password": password });
        if let Some(role) = role {
            body["role"] = Value::from(role);
        }
        let (status, json) = self
            .send(Method::POST, "/api/register", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {}: {}", username, json);
        json
    }

    /// Log in and return the `Authorization` header value
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, json) = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login {}: {}", username, json);
        format!("Bearer {}", json["token"].as_str().unwrap())
    }

    /// Register an admin account and return its bearer header
    pub async fn admin_bearer(&self) -> String {
        self.register("admin", "admin-pass", Some("admin")).await;
        self.login("admin", "admin-pass").await
    }
}
