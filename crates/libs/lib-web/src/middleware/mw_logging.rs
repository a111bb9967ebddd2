//! # Request/Response Logging Middleware
//!
//! Structured log lines for every HTTP request and response: method, path,
//! query, status, duration, and the request ID from the stamping
//! middleware. Credentials and cookies are redacted before headers are
//! logged.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Headers whose values never reach the logs.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-api-key", "authentication"];

/// Log every request and its response outcome.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|q| q.to_string());

    let request_id = req
        .extensions()
        .get::<crate::middleware::mw_req_stamp::RequestStamp>()
        .map(|stamp| stamp.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let headers: Vec<(String, String)> = req
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            let lower = name.as_str().to_lowercase();
            if SENSITIVE_HEADERS.iter().any(|h| lower.contains(h)) {
                Some((name.to_string(), "***REDACTED***".to_string()))
            } else {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            }
        })
        .collect();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query = ?query,
        "request received"
    );
    debug!(request_id = %request_id, headers = ?headers, "request headers");

    let response = next.run(req).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            "request failed"
        );
    } else if status.is_client_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            "client error"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            "request completed"
        );
    }

    response
}
