use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
};
use telegram::models::Update;
use tracing::{error, info, warn};

use crate::domains::chat::handle_update;
use crate::server::app::AppState;

/// Telegram webhook intake
///
/// Only the path carrying the bot token is accepted, and the token is checked
/// before the body is parsed. Processing errors are handled inside the chat
/// layer, so an accepted update always answers 200 and Telegram never
/// redelivers it.
pub async fn webhook_handler(
    Extension(state): Extension<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    if token != state.api_token {
        return (StatusCode::NOT_FOUND, "Not Found");
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Rejecting unparseable webhook body");
            return (StatusCode::BAD_REQUEST, "Bad Request");
        }
    };

    handle_update(update, &state.deps).await;
    (StatusCode::OK, "!")
}

/// Remove and re-register the webhook
pub async fn reset_webhook_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, &'static str) {
    let Some(endpoint) = state.webhook_endpoint.as_deref() else {
        return (StatusCode::BAD_REQUEST, "WEBHOOK_URL is not configured");
    };

    if let Err(e) = state.telegram.delete_webhook().await {
        error!(error = %e, "Failed to remove webhook");
    }

    match state.telegram.set_webhook(endpoint).await {
        Ok(_) => {
            info!("Webhook reset");
            (StatusCode::OK, "Webhook set!")
        }
        Err(e) => {
            error!(error = %e, "Failed to set webhook");
            (StatusCode::BAD_GATEWAY, "Webhook setup failed")
        }
    }
}

/// Register the webhook without removing it first
pub async fn set_webhook_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, &'static str) {
    let Some(endpoint) = state.webhook_endpoint.as_deref() else {
        return (StatusCode::BAD_REQUEST, "WEBHOOK_URL is not configured");
    };

    match state.telegram.set_webhook(endpoint).await {
        Ok(true) => (StatusCode::OK, "Webhook setup ok"),
        Ok(false) => (StatusCode::BAD_GATEWAY, "Webhook setup failed"),
        Err(e) => {
            error!(error = %e, "Failed to set webhook");
            (StatusCode::BAD_GATEWAY, "Webhook setup failed")
        }
    }
}
