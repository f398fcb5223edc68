//! Health Check Handlers
//!
//! # Endpoints
//! - `GET /health` - liveness, no dependencies checked
//! - `GET /metrics` - Prometheus text exposition

use axum::{http::header, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::infrastructure::metrics;

pub const AUTH_SERVICE_NAME: &str = "auth-service";
pub const CHAT_SERVICE_NAME: &str = "chat-service";

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub time: DateTime<Utc>,
}

impl HealthResponse {
    fn ok(service: &str) -> Self {
        Self {
            status: "ok".into(),
            service: service.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            time: Utc::now(),
        }
    }
}

pub async fn auth_health() -> Json<HealthResponse> {
    Json(HealthResponse::ok(AUTH_SERVICE_NAME))
}

pub async fn chat_health() -> Json<HealthResponse> {
    Json(HealthResponse::ok(CHAT_SERVICE_NAME))
}

/// Prometheus metrics endpoint handler
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        metrics::gather_metrics(),
    )
}
