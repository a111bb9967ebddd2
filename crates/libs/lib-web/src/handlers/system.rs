//! # System Handlers
//!
//! Unauthenticated liveness endpoints. Both are pure functions of the
//! loaded settings: no database work, no side effects, fixed-shape JSON.
//! Container orchestration probes `/health` to decide whether the process
//! is alive.

use axum::extract::State;
use axum::Json;
use lib_core::config::{Settings, APP_NAME, APP_VERSION};
use serde::Serialize;
use std::sync::Arc;

/// Liveness descriptor returned by `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub version: &'static str,
    pub environment: String,
}

/// Service descriptor returned by `GET /`.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub docs: String,
    pub health: String,
}

/// `GET /health`
pub async fn health(State(settings): State<Arc<Settings>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        app: APP_NAME,
        version: APP_VERSION,
        environment: settings.app.env.clone(),
    })
}

/// `GET /`
///
/// The `docs` URL is advertised for clients ahead of the interactive API
/// documentation shipping; until that route exists it resolves to the
/// JSON 404 fallback.
pub async fn root(State(settings): State<Arc<Settings>>) -> Json<RootResponse> {
    let base = format!("http://{}:{}", settings.app.host, settings.app.port);
    Json(RootResponse {
        message: "Email Reply Agent API is running",
        docs: format!("{base}/docs"),
        health: format!("{base}/health"),
    })
}
