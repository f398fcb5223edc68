//! Message entity and repository trait.
//!
//! Maps to the `messages` table of the chat service database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Maximum message text length in characters.
pub const MAX_MESSAGE_TEXT_LENGTH: usize = 4000;

/// A message posted to a chat.
///
/// Maps to the `messages` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - chat_id: UUID NOT NULL REFERENCES chats(id) ON DELETE CASCADE
/// - user_id: UUID NOT NULL (author, identity id from the auth service)
/// - text: TEXT NOT NULL
/// - content: TEXT NULL (attachment URL or structured payload)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Whether `user_id` wrote this message.
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Fields for a message that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub content: Option<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct MessageChanges {
    pub text: Option<String>,
    pub content: Option<String>,
}

/// Repository trait for Message data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Messages in a chat, newest first.
    async fn list(&self, chat_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Message>, AppError>;

    /// Find a message within a chat.
    async fn find(&self, chat_id: Uuid, id: i64) -> Result<Option<Message>, AppError>;

    /// Store a new message; the id and timestamp are assigned by the store.
    async fn create(&self, message: &NewMessage) -> Result<Message, AppError>;

    /// Update a message; returns `None` if it does not exist in the chat.
    async fn update(
        &self,
        chat_id: Uuid,
        id: i64,
        changes: &MessageChanges,
    ) -> Result<Option<Message>, AppError>;

    /// Delete the listed messages of one author in a chat. Returns rows deleted.
    async fn delete_many(&self, chat_id: Uuid, author: Uuid, ids: &[i64]) -> Result<u64, AppError>;
}
