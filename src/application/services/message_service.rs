//! Message Service
//!
//! Handles message operations including send, list, edit, delete.
//! Callers must be members of the chat; only authors may edit or delete.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::services::chat_service::{ensure_member, ChatError};
use crate::domain::{ChatRepository, Message, MessageChanges, MessageRepository, NewMessage};
use crate::shared::error::AppError;

/// Default page size for message listings
pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;

/// Largest page size accepted
pub const MAX_MESSAGE_LIMIT: i64 = 100;

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Send a message to a chat
    async fn send_message(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        request: CreateMessageDto,
    ) -> Result<Message, MessageError>;

    /// Get a page of messages, newest first
    async fn get_messages(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        query: MessageQueryDto,
    ) -> Result<Vec<Message>, MessageError>;

    /// Get a single message
    async fn get_message(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        message_id: i64,
    ) -> Result<Message, MessageError>;

    /// Edit a message the caller wrote
    async fn edit_message(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        message_id: i64,
        changes: MessageChanges,
    ) -> Result<Message, MessageError>;

    /// Delete messages the caller wrote; others in the list are skipped
    async fn delete_messages(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        message_ids: Vec<i64>,
    ) -> Result<u64, MessageError>;
}

/// Create message request
#[derive(Debug, Clone)]
pub struct CreateMessageDto {
    pub text: String,
    pub content: Option<String>,
}

/// Message query parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageQueryDto {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl MessageQueryDto {
    /// Clamp to `(limit, offset)` the store can use directly.
    pub fn limit_offset(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_MESSAGE_LIMIT)
            .clamp(1, MAX_MESSAGE_LIMIT);
        let page = self.page.unwrap_or(0).max(0);
        (limit, page.saturating_mul(limit))
    }
}

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Message not found")]
    NotFound,

    #[error("Chat not found")]
    ChatNotFound,

    #[error("Only the author can change this message")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for MessageError {
    fn from(e: AppError) -> Self {
        MessageError::Internal(e.to_string())
    }
}

impl From<ChatError> for MessageError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::NotFound => MessageError::ChatNotFound,
            ChatError::Internal(msg) => MessageError::Internal(msg),
        }
    }
}

impl From<MessageError> for AppError {
    fn from(e: MessageError) -> Self {
        match e {
            MessageError::NotFound => AppError::NotFound("Message not found".into()),
            MessageError::ChatNotFound => AppError::NotFound("Chat not found".into()),
            MessageError::Forbidden => AppError::Forbidden(e.to_string()),
            MessageError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// MessageService implementation
pub struct MessageServiceImpl<M, C>
where
    M: MessageRepository,
    C: ChatRepository,
{
    message_repo: Arc<M>,
    chat_repo: Arc<C>,
}

impl<M, C> MessageServiceImpl<M, C>
where
    M: MessageRepository,
    C: ChatRepository,
{
    pub fn new(message_repo: Arc<M>, chat_repo: Arc<C>) -> Self {
        Self {
            message_repo,
            chat_repo,
        }
    }
}

#[async_trait]
impl<M, C> MessageService for MessageServiceImpl<M, C>
where
    M: MessageRepository + 'static,
    C: ChatRepository + 'static,
{
    async fn send_message(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        request: CreateMessageDto,
    ) -> Result<Message, MessageError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;

        let message = self
            .message_repo
            .create(&NewMessage {
                chat_id,
                user_id: caller,
                text: request.text,
                content: request.content,
            })
            .await?;

        tracing::debug!(chat_id = %chat_id, message_id = message.id, "Message sent");
        Ok(message)
    }

    async fn get_messages(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        query: MessageQueryDto,
    ) -> Result<Vec<Message>, MessageError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;
        let (limit, offset) = query.limit_offset();
        Ok(self.message_repo.list(chat_id, limit, offset).await?)
    }

    async fn get_message(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        message_id: i64,
    ) -> Result<Message, MessageError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;
        self.message_repo
            .find(chat_id, message_id)
            .await?
            .ok_or(MessageError::NotFound)
    }

    async fn edit_message(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        message_id: i64,
        changes: MessageChanges,
    ) -> Result<Message, MessageError> {
        let existing = self.get_message(caller, chat_id, message_id).await?;
        if !existing.is_authored_by(caller) {
            return Err(MessageError::Forbidden);
        }

        self.message_repo
            .update(chat_id, message_id, &changes)
            .await?
            .ok_or(MessageError::NotFound)
    }

    async fn delete_messages(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        message_ids: Vec<i64>,
    ) -> Result<u64, MessageError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;
        let deleted = self
            .message_repo
            .delete_many(chat_id, caller, &message_ids)
            .await?;
        tracing::debug!(chat_id = %chat_id, deleted, "Messages deleted");
        Ok(deleted)
    }
}
