//! User (identity) entity and repository trait.
//!
//! Maps to the `users` table joined with the login column of `auth`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// A registered identity.
///
/// Maps to the `users` table:
/// - id: UUID PRIMARY KEY
/// - username: VARCHAR(50) NOT NULL (display name, not unique)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// `login` lives in the `auth` table and is joined in on reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    /// Unique login name used for authentication
    pub login: String,

    /// Display name
    pub username: String,

    pub created_at: DateTime<Utc>,
}

/// Everything needed to create an identity together with its credential.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub login: String,
    pub username: String,
    /// Argon2id PHC string, never the raw password
    pub password_hash: String,
}

impl NewUser {
    /// Build a new identity with a freshly generated id.
    pub fn new(login: impl Into<String>, username: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            login: login.into(),
            username: username.into(),
            password_hash,
        }
    }
}

/// Repository trait for identity data access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Atomically create the identity, its credential, and its default
    /// group membership. A duplicate login yields `AppError::Conflict`.
    async fn create_with_credential(&self, user: &NewUser) -> Result<User, AppError>;

    /// Delete a user; credential and memberships cascade.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}
