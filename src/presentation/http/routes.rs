//! Route Configuration
//!
//! One router per service. Public routes sit beside a protected group
//! whose `route_layer` runs the bearer token gate.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::presentation::middleware::{auth_middleware, create_trace_layer, track_metrics};
use crate::startup::{AuthState, ChatState};

/// Auth service router
pub fn auth_router(state: AuthState) -> Router {
    let protected = Router::new()
        .route(
            "/auth/user/{user_id}",
            get(handlers::user::get_user).delete(handlers::user::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.verifier.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected)
        .route("/health", get(handlers::health::auth_health))
        .route("/metrics", get(handlers::health::metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(create_trace_layer())
        .with_state(state)
}

/// Chat service router; every `/chat` route is protected
pub fn chat_router(state: ChatState) -> Router {
    let chat_routes = Router::new()
        .route("/chat/list", get(handlers::chat::list_chats))
        .route("/chat/create", post(handlers::chat::create_chat))
        .route("/chat/{chat_id}", delete(handlers::chat::delete_chat))
        .route(
            "/chat/{chat_id}/info",
            get(handlers::chat::get_chat).patch(handlers::chat::update_chat),
        )
        .route(
            "/chat/{chat_id}/members",
            get(handlers::chat::get_members)
                .post(handlers::chat::add_members)
                .delete(handlers::chat::remove_members),
        )
        .route(
            "/chat/{chat_id}/messages",
            get(handlers::message::get_messages).delete(handlers::message::delete_messages),
        )
        .route(
            "/chat/{chat_id}/messages/send",
            post(handlers::message::send_message),
        )
        .route(
            "/chat/{chat_id}/messages/{message_id}",
            get(handlers::message::get_message).patch(handlers::message::edit_message),
        )
        .route_layer(middleware::from_fn_with_state(
            state.verifier.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(chat_routes)
        .route("/health", get(handlers::health::chat_health))
        .route("/metrics", get(handlers::health::metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(create_trace_layer())
        .with_state(state)
}
