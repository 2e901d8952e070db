// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The submission lifecycle talks to chat platforms exclusively through these.

use anyhow::Result;
use async_trait::async_trait;
use telegram::models::Update;

// =============================================================================
// Gateway types
// =============================================================================

/// Where an outbound message goes. Opaque to the submission domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Numeric chat id (users, groups, resolved channels)
    Chat(i64),
    /// Public name such as `@channel`, used when the id is unknown
    Named(String),
}

/// Button rendered under an outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    /// Sends `payload` back as a decision event when pressed
    Action { label: String, payload: String },
    /// Opens an external link
    Link { label: String, url: String },
}

/// Reference to a delivered message, used for later edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: i64,
}

// =============================================================================
// Messaging Gateway Trait (Infrastructure - chat transport)
// =============================================================================

#[async_trait]
pub trait BaseMessagingGateway: Send + Sync {
    /// Send plain text, optionally as a reply and with buttons
    async fn send_text(
        &self,
        destination: &Destination,
        text: &str,
        reply_to: Option<i64>,
        buttons: &[Button],
    ) -> Result<SentMessage>;

    /// Replace the text of an earlier message, dropping any buttons on it
    async fn edit_message(&self, destination: &Destination, message_id: i64, text: &str)
        -> Result<()>;

    /// Post approved content to a publish destination
    async fn send_published(
        &self,
        destination: &Destination,
        text: &str,
        links: &[Button],
    ) -> Result<SentMessage>;

    /// Short acknowledgement shown only to the reviewer who pressed a button
    async fn answer_decision(&self, event_id: &str, text: &str) -> Result<()>;
}

// =============================================================================
// Update Source Trait (Infrastructure - long polling)
// =============================================================================

#[async_trait]
pub trait BaseUpdateSource: Send + Sync {
    /// Wait up to `timeout_secs` for updates with id >= `offset`
    async fn fetch_updates(&self, offset: Option<i64>, timeout_secs: u32) -> Result<Vec<Update>>;

    /// Stop webhook delivery so polling receives updates
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }
}
