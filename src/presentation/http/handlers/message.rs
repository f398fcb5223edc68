//! Message Handlers

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::application::dto::request::{
    DeleteMessagesRequest, EditMessageRequest, MessageQuery, SendMessageRequest,
};
use crate::application::dto::response::{AffectedResponse, MessageResponse, MessagesResponse};
use crate::presentation::http::extractors::{ApiPath, ApiQuery, AuthUser, ValidatedJson};
use crate::shared::error::AppError;
use crate::startup::ChatState;

/// Get a page of messages, newest first
pub async fn get_messages(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath(chat_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<MessageQuery>,
) -> Result<Json<MessagesResponse>, AppError> {
    let messages = state
        .messages
        .get_messages(auth_user.user_id, chat_id, query.into())
        .await?;
    Ok(Json(messages.into()))
}

/// Send a message
pub async fn send_message(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath(chat_id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let message = state
        .messages
        .send_message(auth_user.user_id, chat_id, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

pub async fn get_message(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath((chat_id, message_id)): ApiPath<(Uuid, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = state
        .messages
        .get_message(auth_user.user_id, chat_id, message_id)
        .await?;
    Ok(Json(message.into()))
}

/// Edit a message (author only)
pub async fn edit_message(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath((chat_id, message_id)): ApiPath<(Uuid, i64)>,
    ValidatedJson(body): ValidatedJson<EditMessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = state
        .messages
        .edit_message(auth_user.user_id, chat_id, message_id, body.into())
        .await?;
    Ok(Json(message.into()))
}

/// Delete several of the caller's messages
pub async fn delete_messages(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath(chat_id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<DeleteMessagesRequest>,
) -> Result<Json<AffectedResponse>, AppError> {
    let affected = state
        .messages
        .delete_messages(auth_user.user_id, chat_id, body.messages)
        .await?;
    Ok(Json(AffectedResponse { affected }))
}
