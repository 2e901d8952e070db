//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by every handler.
//! The chat transport sits behind `BaseMessagingGateway` so tests can swap it out.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use telegram::models::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, Update};
use telegram::{TelegramError, TelegramService};
use tracing::warn;

use crate::domains::chat::IntakeSessions;
use crate::domains::submissions::{PublishLink, SubmissionStore};
use crate::kernel::{BaseMessagingGateway, BaseUpdateSource, Button, Destination, SentMessage};

// =============================================================================
// TelegramService Adapter (implements BaseMessagingGateway trait)
// =============================================================================

/// Wrapper around TelegramService that implements BaseMessagingGateway trait
pub struct TelegramAdapter(pub Arc<TelegramService>);

impl TelegramAdapter {
    pub fn new(service: Arc<TelegramService>) -> Self {
        Self(service)
    }
}

fn chat_id(destination: &Destination) -> ChatId {
    match destination {
        Destination::Chat(id) => ChatId::Id(*id),
        Destination::Named(name) => ChatId::Username(name.clone()),
    }
}

fn keyboard(buttons: &[Button]) -> Option<InlineKeyboardMarkup> {
    if buttons.is_empty() {
        return None;
    }

    let row = buttons
        .iter()
        .map(|button| match button {
            Button::Action { label, payload } => {
                InlineKeyboardButton::callback(label.as_str(), payload.as_str())
            }
            Button::Link { label, url } => InlineKeyboardButton::url(label.as_str(), url.as_str()),
        })
        .collect();

    Some(InlineKeyboardMarkup::row(row))
}

#[async_trait]
impl BaseMessagingGateway for TelegramAdapter {
    async fn send_text(
        &self,
        destination: &Destination,
        text: &str,
        reply_to: Option<i64>,
        buttons: &[Button],
    ) -> Result<SentMessage> {
        let message = self
            .0
            .send_message(
                &chat_id(destination),
                text,
                reply_to,
                keyboard(buttons).as_ref(),
                None,
            )
            .await?;

        Ok(SentMessage {
            message_id: message.message_id,
        })
    }

    async fn edit_message(
        &self,
        destination: &Destination,
        message_id: i64,
        text: &str,
    ) -> Result<()> {
        let chat = chat_id(destination);

        // Decision annotations use Markdown bold. User text can break entity
        // parsing, in which case the edit is retried as plain text.
        match self
            .0
            .edit_message_text(&chat, message_id, text, Some(ParseMode::Markdown))
            .await
        {
            Ok(()) => Ok(()),
            Err(TelegramError::Api { description, .. }) => {
                warn!(message_id, %description, "Markdown edit rejected, retrying as plain text");
                self.0
                    .edit_message_text(&chat, message_id, text, None)
                    .await
                    .map_err(Into::into)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn send_published(
        &self,
        destination: &Destination,
        text: &str,
        links: &[Button],
    ) -> Result<SentMessage> {
        self.send_text(destination, text, None, links).await
    }

    async fn answer_decision(&self, event_id: &str, text: &str) -> Result<()> {
        self.0
            .answer_callback_query(event_id, Some(text))
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl BaseUpdateSource for TelegramAdapter {
    async fn fetch_updates(&self, offset: Option<i64>, timeout_secs: u32) -> Result<Vec<Update>> {
        self.0
            .get_updates(offset, timeout_secs)
            .await
            .map_err(Into::into)
    }

    async fn prepare(&self) -> Result<()> {
        self.0.delete_webhook().await?;
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Destinations configured outside the core
#[derive(Debug, Clone)]
pub struct Destinations {
    /// Group where moderators receive decision prompts
    pub review: Destination,
    /// Channel where approved submissions are posted
    pub publish: Destination,
}

/// Server dependencies accessible to handlers (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub gateway: Arc<dyn BaseMessagingGateway>,
    pub destinations: Destinations,
    /// Link buttons attached to every published post
    pub publish_links: Vec<PublishLink>,
    pub store: SubmissionStore,
    /// Users who ran /submit and whose next message is their submission
    pub intake: IntakeSessions,
}

impl ServerDeps {
    /// Create new ServerDeps with empty in-memory state
    pub fn new(
        gateway: Arc<dyn BaseMessagingGateway>,
        destinations: Destinations,
        publish_links: Vec<PublishLink>,
    ) -> Self {
        Self {
            gateway,
            destinations,
            publish_links,
            store: SubmissionStore::new(),
            intake: IntakeSessions::new(),
        }
    }

    pub fn publish_buttons(&self) -> Vec<Button> {
        self.publish_links
            .iter()
            .map(|link| Button::Link {
                label: link.label.clone(),
                url: link.url.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use axum::{routing::post, Extension, Json, Router};
    use serde_json::{json, Value};
    use telegram::TelegramOptions;

    type Recorded = Arc<Mutex<Vec<Value>>>;

    /// Bot API stand-in that refuses Markdown edits, the way Telegram does
    /// when user text breaks entity parsing
    async fn edit_message_text(
        Extension(recorded): Extension<Recorded>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let markdown = body.get("parse_mode").is_some();
        recorded.lock().unwrap().push(body);

        if markdown {
            Json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: can't parse entities"
            }))
        } else {
            Json(json!({"ok": true, "result": true}))
        }
    }

    async fn stub_adapter() -> (TelegramAdapter, Recorded) {
        let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/bottest/editMessageText", post(edit_message_text))
            .layer(Extension(recorded.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let service = TelegramService::new(TelegramOptions {
            bot_token: "test".to_string(),
            api_base: format!("http://{}", addr),
        });
        (TelegramAdapter::new(Arc::new(service)), recorded)
    }

    #[tokio::test]
    async fn test_edit_falls_back_to_plain_text_when_markdown_rejected() {
        let (adapter, recorded) = stub_adapter().await;

        adapter
            .edit_message(&Destination::Chat(-500), 42, "昵称：snake_case *star")
            .await
            .unwrap();

        let calls = recorded.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0]["parse_mode"], "Markdown");
        assert!(calls[1].get("parse_mode").is_none());
        assert_eq!(calls[1]["chat_id"], -500);
        assert_eq!(calls[1]["message_id"], 42);
        assert_eq!(calls[1]["text"], "昵称：snake_case *star");
    }

    #[test]
    fn test_keyboard_single_row() {
        let markup = keyboard(&[
            Button::Action {
                label: "通过".to_string(),
                payload: "approve|x".to_string(),
            },
            Button::Link {
                label: "群".to_string(),
                url: "https://t.me/g".to_string(),
            },
        ])
        .unwrap();

        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(
            markup.inline_keyboard[0][0].callback_data.as_deref(),
            Some("approve|x")
        );
        assert_eq!(
            markup.inline_keyboard[0][1].url.as_deref(),
            Some("https://t.me/g")
        );
    }

    #[test]
    fn test_keyboard_empty() {
        assert!(keyboard(&[]).is_none());
    }

    #[test]
    fn test_chat_id_mapping() {
        assert_eq!(chat_id(&Destination::Chat(-5)), ChatId::Id(-5));
        assert_eq!(
            chat_id(&Destination::Named("@c".to_string())),
            ChatId::Username("@c".to_string())
        );
    }
}
