//! API handlers for the warung backend

pub mod auth;
mod extract;
pub mod health;
pub mod order;
pub mod product;
pub mod stats;
pub mod user;

pub use extract::ApiJson;

// Re-export the access control extractors for handler use
pub use crate::middleware::auth::{AdminUser, AuthenticatedUser};
