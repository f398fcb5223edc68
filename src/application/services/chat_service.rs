//! Chat Service
//!
//! Chat lifecycle and membership. Every operation on an existing chat
//! requires the caller to be a member; non-members get `NotFound`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Chat, ChatChanges, ChatRepository};
use crate::shared::error::AppError;

/// Chat service trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Chats the caller belongs to
    async fn list_chats(&self, caller: Uuid) -> Result<Vec<Chat>, ChatError>;

    /// Create a chat with the caller as its first member
    async fn create_chat(&self, caller: Uuid, request: CreateChatDto) -> Result<Chat, ChatError>;

    async fn get_chat(&self, caller: Uuid, chat_id: Uuid) -> Result<Chat, ChatError>;

    async fn update_chat(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        changes: ChatChanges,
    ) -> Result<Chat, ChatError>;

    async fn delete_chat(&self, caller: Uuid, chat_id: Uuid) -> Result<(), ChatError>;

    async fn get_members(&self, caller: Uuid, chat_id: Uuid) -> Result<Vec<Uuid>, ChatError>;

    async fn add_members(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        members: Vec<Uuid>,
    ) -> Result<u64, ChatError>;

    async fn remove_members(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        members: Vec<Uuid>,
    ) -> Result<u64, ChatError>;
}

/// Create chat request
#[derive(Debug, Clone)]
pub struct CreateChatDto {
    pub name: String,
    pub pic: Option<String>,
}

/// Chat service errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ChatError {
    fn from(e: AppError) -> Self {
        ChatError::Internal(e.to_string())
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::NotFound => AppError::NotFound("Chat not found".into()),
            ChatError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Membership gate shared with the message service.
pub(crate) async fn ensure_member<C>(repo: &C, chat_id: Uuid, user_id: Uuid) -> Result<(), ChatError>
where
    C: ChatRepository + ?Sized,
{
    if repo.is_member(chat_id, user_id).await? {
        Ok(())
    } else {
        Err(ChatError::NotFound)
    }
}

/// ChatService implementation
pub struct ChatServiceImpl<C>
where
    C: ChatRepository,
{
    chat_repo: Arc<C>,
}

impl<C> ChatServiceImpl<C>
where
    C: ChatRepository,
{
    pub fn new(chat_repo: Arc<C>) -> Self {
        Self { chat_repo }
    }
}

#[async_trait]
impl<C> ChatService for ChatServiceImpl<C>
where
    C: ChatRepository + 'static,
{
    async fn list_chats(&self, caller: Uuid) -> Result<Vec<Chat>, ChatError> {
        Ok(self.chat_repo.list_for_user(caller).await?)
    }

    async fn create_chat(&self, caller: Uuid, request: CreateChatDto) -> Result<Chat, ChatError> {
        let chat = Chat {
            id: Uuid::new_v4(),
            name: request.name,
            pic: request.pic,
            created_at: Utc::now(),
        };

        let chat = self.chat_repo.create_with_member(&chat, caller).await?;
        tracing::info!(chat_id = %chat.id, user_id = %caller, "Chat created");
        Ok(chat)
    }

    async fn get_chat(&self, caller: Uuid, chat_id: Uuid) -> Result<Chat, ChatError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;
        self.chat_repo
            .find_by_id(chat_id)
            .await?
            .ok_or(ChatError::NotFound)
    }

    async fn update_chat(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        changes: ChatChanges,
    ) -> Result<Chat, ChatError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;
        self.chat_repo
            .update(chat_id, &changes)
            .await?
            .ok_or(ChatError::NotFound)
    }

    async fn delete_chat(&self, caller: Uuid, chat_id: Uuid) -> Result<(), ChatError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;
        if !self.chat_repo.delete(chat_id).await? {
            return Err(ChatError::NotFound);
        }
        tracing::info!(chat_id = %chat_id, user_id = %caller, "Chat deleted");
        Ok(())
    }

    async fn get_members(&self, caller: Uuid, chat_id: Uuid) -> Result<Vec<Uuid>, ChatError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;
        Ok(self.chat_repo.members(chat_id).await?)
    }

    async fn add_members(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        mut members: Vec<Uuid>,
    ) -> Result<u64, ChatError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;
        members.sort_unstable();
        members.dedup();
        Ok(self.chat_repo.add_members(chat_id, &members).await?)
    }

    async fn remove_members(
        &self,
        caller: Uuid,
        chat_id: Uuid,
        members: Vec<Uuid>,
    ) -> Result<u64, ChatError> {
        ensure_member(self.chat_repo.as_ref(), chat_id, caller).await?;
        Ok(self.chat_repo.remove_members(chat_id, &members).await?)
    }
}
