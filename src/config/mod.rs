//! Runtime settings
//!
//! Everything is read from the process environment (plus an optional `.env`)
//! once at startup. A bad value aborts startup before the listener binds.

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

use crate::auth::{
    DEFAULT_BCRYPT_COST, DEFAULT_TOKEN_TTL_SECONDS, MAX_BCRYPT_COST, MIN_BCRYPT_COST,
};

/// Signing secret used when `JWT_SECRET` is unset outside production
const DEVELOPMENT_JWT_SECRET: &str = "development-secret-change-in-production";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingEnvVar(String),

    #[error("Bad configuration value: {0}")]
    InvalidValue(String),

    #[error("Bad listen port: {0}")]
    InvalidPort(String),
}

/// Deployment stage; only production changes behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stage = match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Self::Development,
            "staging" => Self::Staging,
            "prod" | "production" => Self::Production,
            other => {
                return Err(ConfigError::InvalidValue(format!(
                    "ENVIRONMENT '{}' (use dev, staging or prod)",
                    other
                )))
            }
        };
        Ok(stage)
    }
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub environment: Environment,

    /// Listener address (`HOST`, `PORT`)
    pub host: IpAddr,
    pub port: u16,

    /// Pool size cap (`DB_MAX_CONNECTIONS`)
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection before failing the request
    pub db_acquire_timeout_secs: u64,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,

    /// Comma-separated origin list; unset means permissive CORS
    pub cors_allowed_origins: Option<String>,

    /// Fallback filter when `RUST_LOG` is not parseable by the subscriber
    pub log_level: String,

    pub jwt_secret: String,

    /// Identity token TTL in seconds (default: 28800 = 8 hours)
    pub jwt_ttl_seconds: i64,

    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Config {
    /// Read the process environment, after merging `.env` when present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ENVIRONMENT") {
            Some(value) => value.parse::<Environment>()?,
            None => Environment::Development,
        };

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let host = lookup("HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue("HOST must be an IP address".to_string()))?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("expected 0-65535".to_string()))?;

        let db_max_connections =
            parse_positive("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), 5u32)?;

        let db_acquire_timeout_secs =
            parse_positive("DB_ACQUIRE_TIMEOUT_SECS", lookup("DB_ACQUIRE_TIMEOUT_SECS"), 5u64)?;

        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS");

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        // A production deployment must never sign with the development fallback
        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if environment.is_production() => {
                return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()))
            }
            None => DEVELOPMENT_JWT_SECRET.to_string(),
        };

        let jwt_ttl_seconds = parse_positive(
            "JWT_TTL_SECONDS",
            lookup("JWT_TTL_SECONDS"),
            DEFAULT_TOKEN_TTL_SECONDS,
        )?;

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|cost| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(cost))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(format!(
                        "BCRYPT_COST must be between {} and {}",
                        MIN_BCRYPT_COST, MAX_BCRYPT_COST
                    ))
                })?,
            None => DEFAULT_BCRYPT_COST,
        };

        Ok(Config {
            database_url,
            environment,
            host,
            port,
            db_max_connections,
            db_acquire_timeout_secs,
            run_migrations,
            cors_allowed_origins,
            log_level,
            jwt_secret,
            jwt_ttl_seconds,
            bcrypt_cost,
        })
    }

    /// Whether the signing secret is the built-in development fallback
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }

    /// Database URL with the password replaced, for logs
    pub fn database_url_masked(&self) -> String {
        let url = &self.database_url;
        let start = url.find("://").map_or(0, |i| i + 3);
        let Some(at) = url[start..].find('@').map(|i| start + i) else {
            return url.clone();
        };
        match url[start..at].find(':') {
            Some(colon) => format!("{}****{}", &url[..=start + colon], &url[at..]),
            None => url.clone(),
        }
    }
}

/// Parse an optional positive number, `default` when unset
fn parse_positive<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = value else {
        return Ok(default);
    };

    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|v| *v > T::default())
        .ok_or_else(|| {
            ConfigError::InvalidValue(format!("{} must be a positive integer, got '{}'", key, raw))
        })
}
