//! Authentication module for the warung backend
//!
//! - Password hashing with bcrypt (adaptive cost, per-call salt)
//! - Identity token issuance and verification (HS256 JWT)
//! - Account registration, login and admin account management

mod jwt;
mod password;
mod service;

pub use jwt::{Claims, JwtError, TokenIssuer, DEFAULT_TOKEN_TTL_SECONDS};
pub use password::{
    PasswordError, PasswordHasher, DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST,
};
pub use service::{AuthError, AuthService};
