//! Request tracing middleware

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Paths polled by load balancers; logged at debug to keep the access log readable
const QUIET_PATHS: &[&str] = &["/health"];

/// Middleware for logging request information with timing
///
/// Query strings are never logged; the `Authorization` header is never read.
pub async fn request_tracing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let quiet = QUIET_PATHS.contains(&path.as_str());

    // Extract client IP if a proxy forwarded it
    let client_ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        tracing::error!(%method, %path, status, duration_ms, ?client_ip, "Request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %path, status, duration_ms, ?client_ip, "Request rejected");
    } else if quiet {
        tracing::debug!(%method, %path, status, duration_ms, "Request completed");
    } else {
        tracing::info!(%method, %path, status, duration_ms, ?client_ip, "Request completed");
    }

    response
}
