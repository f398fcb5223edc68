//! User Service
//!
//! Profile lookup and account deletion for registered identities.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> Result<UserDto, UserError>;

    /// Delete `target`. Only the account owner may do this.
    async fn delete_user(&self, caller: Uuid, target: Uuid) -> Result<(), UserError>;
}

/// Public view of a user; the login is not exposed.
#[derive(Debug, Clone)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Cannot delete another user's account")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound => AppError::NotFound("User not found".into()),
            UserError::Forbidden => AppError::Forbidden(e.to_string()),
            UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository + 'static,
{
    async fn get_user(&self, user_id: Uuid) -> Result<UserDto, UserError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .map(UserDto::from)
            .ok_or(UserError::NotFound)
    }

    async fn delete_user(&self, caller: Uuid, target: Uuid) -> Result<(), UserError> {
        if caller != target {
            return Err(UserError::Forbidden);
        }

        self.user_repo.delete(target).await.map_err(|e| match e {
            AppError::NotFound(_) => UserError::NotFound,
            e => UserError::Internal(e.to_string()),
        })?;

        tracing::info!(user_id = %target, "User deleted");
        Ok(())
    }
}
