//! User Handlers

use axum::{extract::State, Json};
use uuid::Uuid;

use crate::application::dto::response::{DeleteUserResponse, UserResponse};
use crate::presentation::http::extractors::{ApiPath, AuthUser};
use crate::shared::error::AppError;
use crate::startup::AuthState;

/// Get a user's public profile
pub async fn get_user(
    State(state): State<AuthState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.get_user(user_id).await?;
    Ok(Json(user.into()))
}

/// Delete the caller's own account
pub async fn delete_user(
    State(state): State<AuthState>,
    auth_user: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<DeleteUserResponse>, AppError> {
    state.users.delete_user(auth_user.user_id, user_id).await?;
    Ok(Json(DeleteUserResponse { user_id }))
}
