//! Presentation Layer
//!
//! HTTP routers, handlers, extractors and middleware for both services.

pub mod http;
pub mod middleware;
