//! Authentication Middleware
//!
//! Bearer token gate for protected routes. On success the verified
//! identity is attached to the request as an [`AuthUser`] extension;
//! every failure yields the same 401 body.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::application::services::{TokenError, TokenVerifier};
use crate::infrastructure::metrics;
use crate::presentation::http::extractors::AuthUser;
use crate::shared::error::AppError;

/// Message returned for every rejected token.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing token";

/// Authentication middleware that validates bearer tokens
pub async fn auth_middleware(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verified = match request.headers().get(AUTHORIZATION) {
        None => verifier.verify_header(None),
        Some(value) => match value.to_str() {
            Ok(header) => verifier.verify_header(Some(header)),
            Err(_) => Err(TokenError::MalformedHeader),
        },
    };

    let claims = match verified {
        Ok(claims) => claims,
        Err(e) => {
            metrics::record_token_verification(e.label());
            tracing::debug!(reason = e.label(), "Rejected bearer token");
            return Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.into()));
        }
    };

    metrics::record_token_verification("valid");
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}
