use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub mode: String,
    pub pending_submissions: usize,
    pub awaiting_intake: usize,
}

/// Health check endpoint
///
/// Reports the in-memory queue sizes. Nothing external is probed, so this
/// always answers 200 while the process is serving.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let mode = if state.webhook_endpoint.is_some() {
        "webhook"
    } else {
        "polling"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            mode: mode.to_string(),
            pending_submissions: state.deps.store.len(),
            awaiting_intake: state.deps.intake.len(),
        }),
    )
}
