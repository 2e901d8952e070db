// Minimal Telegram Bot API client
// https://core.telegram.org/bots/api

pub mod models;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::models::{
    AnswerCallbackQueryRequest, ApiResponse, Chat, ChatId, EditMessageTextRequest,
    GetChatRequest, GetUpdatesRequest, InlineKeyboardMarkup, Message, ParseMode,
    SendMessageRequest, SetWebhookRequest, Update,
};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("Request to Telegram failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram returned an error ({code:?}): {description}")]
    Api {
        code: Option<i32>,
        description: String,
    },

    #[error("Telegram response for {0} had no result")]
    MissingResult(&'static str),
}

#[derive(Debug, Clone)]
pub struct TelegramOptions {
    pub bot_token: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{base}/bot{token}/{method}",
            base = self.options.api_base.trim_end_matches('/'),
            token = self.options.bot_token,
            method = method
        )
    }

    async fn call<P, R>(&self, method: &'static str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(method, "Calling Telegram Bot API");

        let response = self
            .client
            .post(self.method_url(method))
            .json(params)
            .send()
            .await?;

        // Bot API reports failures in the JSON envelope, with a non-2xx status
        let body = response.json::<ApiResponse<R>>().await?;
        if !body.ok {
            let description = body
                .description
                .unwrap_or_else(|| "unknown error".to_string());
            error!(method, code = ?body.error_code, %description, "Telegram API error");
            return Err(TelegramError::Api {
                code: body.error_code,
                description,
            });
        }

        body.result.ok_or(TelegramError::MissingResult(method))
    }

    pub async fn send_message(
        &self,
        chat_id: &ChatId,
        text: &str,
        reply_to_message_id: Option<i64>,
        reply_markup: Option<&InlineKeyboardMarkup>,
        parse_mode: Option<ParseMode>,
    ) -> Result<Message, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
            reply_to_message_id,
            reply_markup,
        };
        self.call("sendMessage", &request).await
    }

    /// Replace the text of a sent message. Omitting `reply_markup` drops its inline keyboard.
    pub async fn edit_message_text(
        &self,
        chat_id: &ChatId,
        message_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), TelegramError> {
        let request = EditMessageTextRequest {
            chat_id,
            message_id,
            text,
            parse_mode,
        };
        // Result is the edited Message, or `true` for inline messages
        self.call::<_, serde_json::Value>("editMessageText", &request)
            .await
            .map(|_| ())
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramError> {
        let request = AnswerCallbackQueryRequest {
            callback_query_id,
            text,
        };
        self.call::<_, bool>("answerCallbackQuery", &request)
            .await
            .map(|_| ())
    }

    pub async fn get_chat(&self, chat_id: &ChatId) -> Result<Chat, TelegramError> {
        self.call("getChat", &GetChatRequest { chat_id }).await
    }

    /// Long-poll for updates. `timeout` is in seconds.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: u32,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: &["message", "callback_query"],
        };
        self.call("getUpdates", &request).await
    }

    pub async fn set_webhook(&self, url: &str) -> Result<bool, TelegramError> {
        self.call("setWebhook", &SetWebhookRequest { url }).await
    }

    pub async fn delete_webhook(&self) -> Result<bool, TelegramError> {
        self.call("deleteWebhook", &serde_json::json!({})).await
    }
}
