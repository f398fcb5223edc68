//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::application::services::{CreateChatDto, CreateMessageDto, MessageQueryDto};
use crate::domain::{ChatChanges, MessageChanges};

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 255, message = "Login must be 1-255 characters"))]
    pub login: String,

    #[validate(length(min = 1, max = 255, message = "Password must be 1-255 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255, message = "Login must be 1-255 characters"))]
    pub login: String,

    #[validate(length(min = 1, max = 255, message = "Password must be 1-255 characters"))]
    pub password: String,
}

/// Create chat request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChatRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub pic: Option<String>,
}

impl From<CreateChatRequest> for CreateChatDto {
    fn from(req: CreateChatRequest) -> Self {
        Self {
            name: req.name,
            pic: req.pic,
        }
    }
}

/// Update chat request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChatRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    pub pic: Option<String>,
}

impl From<UpdateChatRequest> for ChatChanges {
    fn from(req: UpdateChatRequest) -> Self {
        Self {
            name: req.name,
            pic: req.pic,
        }
    }
}

/// Add or remove chat members
#[derive(Debug, Deserialize, Validate)]
pub struct MembersRequest {
    #[validate(length(min = 1, message = "At least one member is required"))]
    pub members: Vec<Uuid>,
}

/// Send message request
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Text must be 1-4000 characters"))]
    pub text: String,

    pub content: Option<String>,
}

impl From<SendMessageRequest> for CreateMessageDto {
    fn from(req: SendMessageRequest) -> Self {
        Self {
            text: req.text,
            content: req.content,
        }
    }
}

/// Edit message request
#[derive(Debug, Deserialize, Validate)]
pub struct EditMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Text must be 1-4000 characters"))]
    pub text: Option<String>,

    pub content: Option<String>,
}

impl From<EditMessageRequest> for MessageChanges {
    fn from(req: EditMessageRequest) -> Self {
        Self {
            text: req.text,
            content: req.content,
        }
    }
}

/// Delete messages request
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteMessagesRequest {
    #[validate(length(min = 1, message = "At least one message id is required"))]
    pub messages: Vec<i64>,
}

/// Message listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<MessageQuery> for MessageQueryDto {
    fn from(q: MessageQuery) -> Self {
        Self {
            page: q.page,
            limit: q.limit,
        }
    }
}
