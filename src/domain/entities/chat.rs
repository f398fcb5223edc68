//! Chat entity and repository trait.
//!
//! Maps to the `chats` and `user_chat` tables of the chat service database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// A group conversation.
///
/// Maps to the `chats` table:
/// - id: UUID PRIMARY KEY
/// - name: VARCHAR(255) NOT NULL
/// - pic: TEXT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub name: String,
    pub pic: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ChatChanges {
    pub name: Option<String>,
    pub pic: Option<String>,
}

/// Chat and chat-membership data access.
///
/// User ids here are identity ids issued by the auth service; the chat
/// database holds no foreign key to them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// All chats the user is a member of.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, AppError>;

    /// Create a chat and make `creator` its first member, atomically.
    async fn create_with_member(&self, chat: &Chat, creator: Uuid) -> Result<Chat, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>, AppError>;

    /// Apply changes; returns `None` if the chat does not exist.
    async fn update(&self, id: Uuid, changes: &ChatChanges) -> Result<Option<Chat>, AppError>;

    /// Delete a chat. Returns false if nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn is_member(&self, chat_id: Uuid, user_id: Uuid) -> Result<bool, AppError>;

    async fn members(&self, chat_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// Add members, ignoring ones already present. Returns rows inserted.
    async fn add_members(&self, chat_id: Uuid, user_ids: &[Uuid]) -> Result<u64, AppError>;

    /// Remove members. Returns rows deleted.
    async fn remove_members(&self, chat_id: Uuid, user_ids: &[Uuid]) -> Result<u64, AppError>;
}
