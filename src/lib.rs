//! Warung Backend Library
//!
//! Account registration and login with role-gated access, product catalog
//! management and order capture over PostgreSQL.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
