use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// What a user is allowed to see in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full dashboard with employee management controls.
    Admin,
    /// Read-only dashboard.
    Client,
}

impl Role {
    /// The lowercase name stored in the database and sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Role::Admin),
            "client" => Ok(Role::Client),
            other => Err(AppError::Validation(format!(
                "Role must be either 'admin' or 'client', got '{}'",
                other
            ))),
        }
    }
}

/// Represents a registered user.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's login name.
    pub username: String,
    /// The Argon2id PHC string of the user's password.
    pub password_hash: String,
    /// The user's role.
    pub role: Role,
    /// The timestamp when the user registered.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for User {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self> {
        let role: String = row.try_get("role")?;
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            role: role
                .parse()
                .map_err(|_| AppError::Internal(format!("Unknown role in users table: {}", role)))?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A user about to be inserted.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}
