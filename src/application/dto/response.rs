//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::token_service::BEARER_SCHEME;
use crate::application::services::{LoginOutcome, Registration, UserDto};
use crate::domain::{Chat, Message};

/// Registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub username: String,
}

impl From<Registration> for RegisterResponse {
    fn from(r: Registration) -> Self {
        Self {
            user_id: r.user_id,
            username: r.username,
        }
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub groups: Vec<Uuid>,
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            user_id: outcome.user_id,
            username: outcome.username,
            groups: outcome.groups,
            token: outcome.token,
            token_type: BEARER_SCHEME.to_string(),
            expires_at: outcome.expires_at,
        }
    }
}

/// Public user profile
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub created_at: String,
}

impl From<UserDto> for UserResponse {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
            created_at: dto.created_at,
        }
    }
}

/// Account deletion response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub user_id: Uuid,
}

/// Chat response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            name: chat.name,
            pic: chat.pic,
            created_at: chat.created_at,
        }
    }
}

/// Chat member list
#[derive(Debug, Serialize, Deserialize)]
pub struct MembersResponse {
    pub members: Vec<Uuid>,
}

/// Number of rows a bulk operation touched
#[derive(Debug, Serialize, Deserialize)]
pub struct AffectedResponse {
    pub affected: u64,
}

/// Message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: i64,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            chat_id: m.chat_id,
            user_id: m.user_id,
            text: m.text,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

/// Page of messages, newest first
#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageResponse>,
}

impl From<Vec<Message>> for MessagesResponse {
    fn from(messages: Vec<Message>) -> Self {
        Self {
            messages: messages.into_iter().map(MessageResponse::from).collect(),
        }
    }
}
