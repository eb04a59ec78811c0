//! User entity and repository trait.
//!
//! Maps to the `users` table. Users exist only to obtain API tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::shared::error::AppError;

/// An account allowed to call the API.
///
/// Maps to the `users` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - username: VARCHAR(150) NOT NULL UNIQUE
/// - password_hash: TEXT NOT NULL (Argon2 PHC string)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,

    pub username: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for User data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by internal ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by username (exact match).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Create a new user with an already hashed password.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError>;
}
