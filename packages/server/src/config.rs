use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::submissions::PublishLink;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub telegram_api_base: String,
    /// Publish channel, `@username` or numeric id
    pub channel_username: String,
    pub review_group_id: i64,
    /// Base URL for webhook mode. Long-polling is used when unset.
    pub webhook_url: Option<String>,
    pub port: u16,
    pub publish_links: Vec<PublishLink>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            api_token: env::var("API_TOKEN").context("API_TOKEN must be set")?,
            telegram_api_base: env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| telegram::DEFAULT_API_BASE.to_string()),
            channel_username: env::var("CHANNEL_USERNAME")
                .context("CHANNEL_USERNAME must be set")?,
            review_group_id: env::var("REVIEW_GROUP_ID")
                .context("REVIEW_GROUP_ID must be set")?
                .trim()
                .parse()
                .context("REVIEW_GROUP_ID must be a valid chat id")?,
            webhook_url: env::var("WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            publish_links: parse_publish_links(&env::var("PUBLISH_LINKS").unwrap_or_default())
                .context("PUBLISH_LINKS must be comma-separated label=url pairs")?,
        })
    }

    /// Full webhook URL Telegram should push updates to
    pub fn webhook_endpoint(&self) -> Option<String> {
        self.webhook_url
            .as_ref()
            .map(|base| format!("{}{}", base, self.api_token))
    }
}

/// Parse `label=url,label=url` into link buttons
pub fn parse_publish_links(raw: &str) -> Result<Vec<PublishLink>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (label, url) = entry
                .split_once('=')
                .with_context(|| format!("missing '=' in link entry '{}'", entry))?;
            let (label, url) = (label.trim(), url.trim());
            anyhow::ensure!(
                !label.is_empty() && !url.is_empty(),
                "empty label or url in link entry '{}'",
                entry
            );
            Ok(PublishLink {
                label: label.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publish_links() {
        let links =
            parse_publish_links("我要投稿=https://t.me/submit_bot, 交友聊天=https://t.me/group")
                .unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].label, "我要投稿");
        assert_eq!(links[1].url, "https://t.me/group");
    }

    #[test]
    fn test_parse_publish_links_empty() {
        assert!(parse_publish_links("").unwrap().is_empty());
        assert!(parse_publish_links(" , ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_publish_links_rejects_malformed() {
        assert!(parse_publish_links("no-delimiter").is_err());
        assert!(parse_publish_links("=https://t.me/x").is_err());
    }

    #[test]
    fn test_webhook_endpoint_appends_token() {
        let config = Config {
            api_token: "123:abc".to_string(),
            telegram_api_base: telegram::DEFAULT_API_BASE.to_string(),
            channel_username: "@channel".to_string(),
            review_group_id: -100,
            webhook_url: Some("https://bot.example.com/".to_string()),
            port: 8000,
            publish_links: Vec::new(),
        };

        assert_eq!(
            config.webhook_endpoint().as_deref(),
            Some("https://bot.example.com/123:abc")
        );
    }
}
