use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Liveness check.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "gemini-proxy",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check. A missing credential is reported but does not fail the
/// check: the relay still serves its configuration error to callers.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "credential_configured": state.provider.is_some()
        })),
    )
}
