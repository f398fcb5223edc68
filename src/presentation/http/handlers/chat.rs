//! Chat Handlers

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::application::dto::request::{CreateChatRequest, MembersRequest, UpdateChatRequest};
use crate::application::dto::response::{AffectedResponse, ChatResponse, MembersResponse};
use crate::presentation::http::extractors::{ApiPath, AuthUser, ValidatedJson};
use crate::shared::error::AppError;
use crate::startup::ChatState;

/// List chats the caller belongs to
pub async fn list_chats(
    State(state): State<ChatState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ChatResponse>>, AppError> {
    let chats = state.chats.list_chats(auth_user.user_id).await?;
    Ok(Json(chats.into_iter().map(ChatResponse::from).collect()))
}

/// Create a chat with the caller as its first member
pub async fn create_chat(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), AppError> {
    let chat = state.chats.create_chat(auth_user.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(chat.into())))
}

pub async fn get_chat(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath(chat_id): ApiPath<Uuid>,
) -> Result<Json<ChatResponse>, AppError> {
    let chat = state.chats.get_chat(auth_user.user_id, chat_id).await?;
    Ok(Json(chat.into()))
}

pub async fn update_chat(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath(chat_id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let chat = state
        .chats
        .update_chat(auth_user.user_id, chat_id, body.into())
        .await?;
    Ok(Json(chat.into()))
}

/// Delete a chat along with its members and messages
pub async fn delete_chat(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath(chat_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.chats.delete_chat(auth_user.user_id, chat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_members(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath(chat_id): ApiPath<Uuid>,
) -> Result<Json<MembersResponse>, AppError> {
    let members = state.chats.get_members(auth_user.user_id, chat_id).await?;
    Ok(Json(MembersResponse { members }))
}

pub async fn add_members(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath(chat_id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<MembersRequest>,
) -> Result<Json<AffectedResponse>, AppError> {
    let affected = state
        .chats
        .add_members(auth_user.user_id, chat_id, body.members)
        .await?;
    Ok(Json(AffectedResponse { affected }))
}

pub async fn remove_members(
    State(state): State<ChatState>,
    auth_user: AuthUser,
    ApiPath(chat_id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<MembersRequest>,
) -> Result<Json<AffectedResponse>, AppError> {
    let affected = state
        .chats
        .remove_members(auth_user.user_id, chat_id, body.members)
        .await?;
    Ok(Json(AffectedResponse { affected }))
}
