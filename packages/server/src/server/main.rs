// Main entry point for the submission bot

use std::sync::Arc;

use anyhow::{Context, Result};
use submission_core::kernel::{Destination, Destinations, ServerDeps, TelegramAdapter};
use submission_core::server::{build_app, ctrl_c, shutdown_on, AppState, UpdatePoller};
use submission_core::Config;
use telegram::models::ChatId;
use telegram::{TelegramOptions, TelegramService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Look up the publish channel's numeric id. Falls back to the configured
/// name, which the Bot API also accepts for public channels.
async fn resolve_publish_destination(telegram: &TelegramService, channel: &str) -> Destination {
    match ChatId::parse(channel) {
        ChatId::Id(id) => Destination::Chat(id),
        named => match telegram.get_chat(&named).await {
            Ok(chat) => {
                tracing::info!(channel, chat_id = chat.id, "Publish channel resolved");
                Destination::Chat(chat.id)
            }
            Err(e) => {
                tracing::warn!(channel, error = %e, "Could not resolve publish channel, using its name");
                Destination::Named(named.to_string())
            }
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,submission_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting submission bot");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        review_group_id = config.review_group_id,
        channel = %config.channel_username,
        publish_links = config.publish_links.len(),
        "Configuration loaded"
    );

    let telegram = Arc::new(TelegramService::new(TelegramOptions {
        bot_token: config.api_token.clone(),
        api_base: config.telegram_api_base.clone(),
    }));
    let adapter = Arc::new(TelegramAdapter::new(telegram.clone()));

    let destinations = Destinations {
        review: Destination::Chat(config.review_group_id),
        publish: resolve_publish_destination(&telegram, &config.channel_username).await,
    };

    let deps = Arc::new(ServerDeps::new(
        adapter.clone(),
        destinations,
        config.publish_links.clone(),
    ));

    let webhook_endpoint = config.webhook_endpoint();

    let poller_shutdown = match &webhook_endpoint {
        Some(endpoint) => {
            tracing::info!("Registering webhook");
            match telegram.set_webhook(endpoint).await {
                Ok(true) => tracing::info!("Webhook registered"),
                Ok(false) => tracing::warn!("Telegram declined the webhook registration"),
                Err(e) => tracing::error!(error = %e, "Failed to register webhook"),
            }
            None
        }
        None => {
            tracing::info!("WEBHOOK_URL not set, starting long polling");
            let poller = UpdatePoller::new(adapter.clone(), deps.clone());
            let handle = poller.shutdown_handle();
            tokio::spawn(async move {
                if let Err(e) = poller.run().await {
                    tracing::error!(error = %e, "Update poller exited");
                }
            });
            Some(handle)
        }
    };

    let app = build_app(AppState {
        deps,
        telegram,
        api_token: config.api_token.clone(),
        webhook_endpoint,
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    // Ctrl+C stops the poller and drains the HTTP server together
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(ctrl_c(), poller_shutdown))
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");

    Ok(())
}
