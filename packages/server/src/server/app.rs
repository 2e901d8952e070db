//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use telegram::TelegramService;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{health_handler, reset_webhook_handler, set_webhook_handler, webhook_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub telegram: Arc<TelegramService>,
    /// Bot token; doubles as the secret webhook path segment
    pub api_token: String,
    /// Full webhook URL, when running in webhook mode
    pub webhook_endpoint: Option<String>,
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        // Telegram pushes updates to /<token>
        .route("/:token", post(webhook_handler))
        .route("/", get(reset_webhook_handler))
        .route("/set_webhook", get(set_webhook_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
