//! Authentication Handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::request::{LoginRequest, RegisterRequest};
use crate::application::dto::response::{LoginResponse, RegisterResponse};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::startup::AuthState;

/// Register a new identity
pub async fn register(
    State(state): State<AuthState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let registration = state
        .auth
        .register(&body.username, &body.login, &body.password)
        .await?;

    Ok((StatusCode::CREATED, Json(registration.into())))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AuthState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let outcome = state.auth.login(&body.login, &body.password).await?;
    Ok(Json(outcome.into()))
}
