//! Health check endpoint.

use axum::http::StatusCode;

/// Liveness probe.
pub async fn check() -> StatusCode {
    StatusCode::OK
}
