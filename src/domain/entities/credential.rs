//! Credential entity and repository trait.
//!
//! Maps to the `auth` table.

use async_trait::async_trait;
use uuid::Uuid;

use crate::shared::error::AppError;

/// Login credential belonging to exactly one user.
///
/// Maps to the `auth` table:
/// - user_id: UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE
/// - login: VARCHAR(255) UNIQUE NOT NULL
/// - password_hash: VARCHAR(255) NOT NULL
/// - jwt: TEXT NULL
#[derive(Clone)]
pub struct Credential {
    pub user_id: Uuid,
    pub login: String,

    /// Argon2id PHC string
    pub password_hash: String,

    /// Last token handed out, if a caller chose to cache one.
    /// Login does not write this column.
    pub cached_token: Option<String>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("login", &self.login)
            .field("password_hash", &"<redacted>")
            .field("cached_token", &self.cached_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Read access to credentials. Creation goes through
/// [`UserRepository::create_with_credential`](super::UserRepository::create_with_credential)
/// so that an identity never exists without its credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Look up a credential by login.
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>, AppError>;

    /// Check whether a login is already registered.
    async fn login_exists(&self, login: &str) -> Result<bool, AppError>;
}
