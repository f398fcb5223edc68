//! Authentication Service
//!
//! Registration and login. Registration writes the identity, credential and
//! default-group membership in one transaction; login verifies the password
//! and issues a token carrying the user's current groups.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::services::token_service::{TokenError, TokenIssuer};
use crate::domain::{CredentialRepository, GroupRepository, NewUser, UserRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// PHC string verified when the login is unknown, so both failure paths
/// cost one Argon2 evaluation with default parameters.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new identity. No token is issued.
    async fn register(
        &self,
        username: &str,
        login: &str,
        password: &str,
    ) -> Result<Registration, AuthError>;

    /// Check credentials and issue a token.
    async fn login(&self, login: &str, password: &str) -> Result<LoginOutcome, AuthError>;
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user_id: Uuid,
    pub username: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user_id: Uuid,
    pub username: String,
    pub groups: Vec<Uuid>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown login or wrong password; deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Login already taken")]
    LoginTaken,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Unauthenticated,
            AuthError::LoginTaken => AppError::Conflict("Login already taken".into()),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// AuthService implementation
pub struct AuthServiceImpl<U, C, G>
where
    U: UserRepository,
    C: CredentialRepository,
    G: GroupRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    group_repo: Arc<G>,
    issuer: Arc<TokenIssuer>,
}

impl<U, C, G> AuthServiceImpl<U, C, G>
where
    U: UserRepository,
    C: CredentialRepository,
    G: GroupRepository,
{
    /// Create a new AuthServiceImpl
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        group_repo: Arc<G>,
        issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            group_repo,
            issuer,
        }
    }

    /// Hash a password using Argon2id with a random salt
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its stored hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[async_trait]
impl<U, C, G> AuthService for AuthServiceImpl<U, C, G>
where
    U: UserRepository + 'static,
    C: CredentialRepository + 'static,
    G: GroupRepository + 'static,
{
    async fn register(
        &self,
        username: &str,
        login: &str,
        password: &str,
    ) -> Result<Registration, AuthError> {
        // Fast path; the unique constraint on auth.login settles races.
        if self
            .credential_repo
            .login_exists(login)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
        {
            metrics::record_auth_event("register", "conflict");
            return Err(AuthError::LoginTaken);
        }

        let password_hash = self.hash_password(password)?;
        let new_user = NewUser::new(login, username, password_hash);

        let user = self
            .user_repo
            .create_with_credential(&new_user)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => {
                    metrics::record_auth_event("register", "conflict");
                    AuthError::LoginTaken
                }
                e => {
                    metrics::record_auth_event("register", "error");
                    AuthError::Internal(e.to_string())
                }
            })?;

        metrics::record_auth_event("register", "success");
        tracing::info!(user_id = %user.id, "User registered");

        Ok(Registration {
            user_id: user.id,
            username: user.username,
        })
    }

    async fn login(&self, login: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let credential = self
            .credential_repo
            .find_by_login(login)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let Some(credential) = credential else {
            let _ = self.verify_password(password, DUMMY_PASSWORD_HASH);
            metrics::record_auth_event("login", "failure");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, &credential.password_hash)? {
            metrics::record_auth_event("login", "failure");
            tracing::debug!(user_id = %credential.user_id, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        // Deleted between the credential read and now.
        let user = self
            .user_repo
            .find_by_id(credential.user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        let groups = self
            .group_repo
            .group_ids_for_user(user.id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let issued = self.issuer.issue(user.id, &user.username, groups)?;
        let expires_at = DateTime::<Utc>::from_timestamp(issued.claims.exp, 0)
            .ok_or_else(|| AuthError::Internal("Token expiry out of range".into()))?;

        metrics::record_auth_event("login", "success");
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            user_id: user.id,
            username: user.username,
            groups: issued.claims.groups,
            token: issued.token,
            expires_at,
        })
    }
}
