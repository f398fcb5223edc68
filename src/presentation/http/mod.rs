//! HTTP
//!
//! Routers, handlers and extractors for the auth and chat services.

pub mod extractors;
pub mod handlers;
pub mod routes;

pub use routes::{auth_router, chat_router};
