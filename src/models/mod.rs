//! Data models for the warung backend

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod auth;
pub mod catalog;

pub use auth::*;
pub use catalog::*;

/// Account roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Raised when a stored or submitted role is outside the known set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown role '{0}': expected 'user' or 'admin'")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Parse a role from optional client input; absent or blank means `User`
    pub fn from_input(input: Option<&str>) -> Result<Self, UnknownRole> {
        match input.map(str::trim) {
            None | Some("") => Ok(Role::User),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored account, including the password hash. Never serialized.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl Account {
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// Account as exposed over the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_input_defaults_to_user() {
        assert_eq!(Role::from_input(None).unwrap(), Role::User);
        assert_eq!(Role::from_input(Some("   ")).unwrap(), Role::User);
        assert_eq!(Role::from_input(Some(" admin ")).unwrap(), Role::Admin);
    }

    #[test]
    fn test_role_rejects_unknown() {
        let err = Role::from_input(Some("kasir")).unwrap_err();
        assert_eq!(err, UnknownRole("kasir".to_string()));
        // Roles are case-sensitive like usernames
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_account_summary_hides_hash() {
        let account = Account {
            id: 7,
            username: "alice".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
            role: Role::Admin,
        };

        let json = serde_json::to_value(account.summary()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "username": "alice", "role": "admin"})
        );
    }
}
