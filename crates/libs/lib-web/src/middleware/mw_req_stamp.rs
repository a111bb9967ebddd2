//! # Request Stamping Middleware
//!
//! Tags every request with a unique ID so log lines from one request can be
//! correlated across middleware, handlers, and trace spans. The ID is also
//! echoed back in the `X-Request-ID` response header.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::time::SystemTime;
use uuid::Uuid;

/// Per-request metadata, available to handlers via `Extension<RequestStamp>`.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    /// Unique request identifier.
    pub id: String,
    /// When the request entered the middleware stack.
    pub received_at: SystemTime,
}

impl RequestStamp {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            received_at: SystemTime::now(),
        }
    }
}

/// Stamp the request with an ID and echo it on the response.
pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let stamp = RequestStamp::new();
    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert("X-Request-ID", value);
    }

    res
}
