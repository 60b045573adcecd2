//! Request logging middleware.

use crate::controllers::players_controller::X_CACHE;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Logs one line per request, including the leaderboard cache status when present.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();
    let cache = response
        .headers()
        .get(X_CACHE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    if status.is_server_error() {
        warn!(
            target: "rankboard::http",
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request failed"
        );
    } else {
        info!(
            target: "rankboard::http",
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            cache,
            duration_ms = duration.as_millis() as u64,
            "HTTP request completed"
        );
    }

    response
}
