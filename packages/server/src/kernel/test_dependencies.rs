// TestDependencies - mock implementations for testing
//
// Provides a recording gateway that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseMessagingGateway, Button, Destination, Destinations, SentMessage, ServerDeps};
use crate::domains::submissions::PublishLink;

pub const TEST_REVIEW_CHAT: i64 = -1001;
pub const TEST_PUBLISH_CHAT: i64 = -2002;

// =============================================================================
// Mock Messaging Gateway
// =============================================================================

/// One outbound call captured by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    SendText {
        destination: Destination,
        text: String,
        reply_to: Option<i64>,
        buttons: Vec<Button>,
    },
    EditMessage {
        destination: Destination,
        message_id: i64,
        text: String,
    },
    SendPublished {
        destination: Destination,
        text: String,
        links: Vec<Button>,
    },
    AnswerDecision {
        event_id: String,
        text: String,
    },
}

pub struct MockGateway {
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    next_message_id: AtomicI64,
    fail_sends: AtomicBool,
    fail_publish: AtomicBool,
    publish_delay: Mutex<Option<Duration>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            next_message_id: AtomicI64::new(100),
            fail_sends: AtomicBool::new(false),
            fail_publish: AtomicBool::new(false),
            publish_delay: Mutex::new(None),
        }
    }

    /// Make every `send_text` call fail
    pub fn failing_sends(self) -> Self {
        self.fail_sends.store(true, Ordering::SeqCst);
        self
    }

    /// Make every `send_published` call fail
    pub fn failing_publish(self) -> Self {
        self.fail_publish.store(true, Ordering::SeqCst);
        self
    }

    /// Sleep inside `send_published`, widening race windows in concurrency tests
    pub fn with_publish_delay(self, delay: Duration) -> Self {
        *self.publish_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts sent with `send_text` to the given destination
    pub fn texts_to(&self, destination: &Destination) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::SendText {
                    destination: d,
                    text,
                    ..
                } if &d == destination => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Buttons attached to each `send_text` call to the given destination
    pub fn buttons_to(&self, destination: &Destination) -> Vec<Vec<Button>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::SendText {
                    destination: d,
                    buttons,
                    ..
                } if &d == destination => Some(buttons),
                _ => None,
            })
            .collect()
    }

    pub fn published(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::SendPublished { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<(i64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::EditMessage {
                    message_id, text, ..
                } => Some((message_id, text)),
                _ => None,
            })
            .collect()
    }

    pub fn answers(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::AnswerDecision { event_id, text } => Some((event_id, text)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_message(&self) -> SentMessage {
        SentMessage {
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMessagingGateway for MockGateway {
    async fn send_text(
        &self,
        destination: &Destination,
        text: &str,
        reply_to: Option<i64>,
        buttons: &[Button],
    ) -> Result<SentMessage> {
        self.record(GatewayCall::SendText {
            destination: destination.clone(),
            text: text.to_string(),
            reply_to,
            buttons: buttons.to_vec(),
        });

        if self.fail_sends.load(Ordering::SeqCst) {
            anyhow::bail!("mock gateway: send_text failed");
        }
        Ok(self.next_message())
    }

    async fn edit_message(
        &self,
        destination: &Destination,
        message_id: i64,
        text: &str,
    ) -> Result<()> {
        self.record(GatewayCall::EditMessage {
            destination: destination.clone(),
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_published(
        &self,
        destination: &Destination,
        text: &str,
        links: &[Button],
    ) -> Result<SentMessage> {
        let delay = *self.publish_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.record(GatewayCall::SendPublished {
            destination: destination.clone(),
            text: text.to_string(),
            links: links.to_vec(),
        });

        if self.fail_publish.load(Ordering::SeqCst) {
            anyhow::bail!("mock gateway: publish failed");
        }
        Ok(self.next_message())
    }

    async fn answer_decision(&self, event_id: &str, text: &str) -> Result<()> {
        self.record(GatewayCall::AnswerDecision {
            event_id: event_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Test dependency builder
// =============================================================================

/// Builds ServerDeps wired to a MockGateway
pub struct TestDependencies {
    pub gateway: Arc<MockGateway>,
    pub publish_links: Vec<PublishLink>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            gateway: Arc::new(MockGateway::new()),
            publish_links: Vec::new(),
        }
    }

    pub fn with_gateway(mut self, gateway: MockGateway) -> Self {
        self.gateway = Arc::new(gateway);
        self
    }

    pub fn with_publish_link(mut self, label: &str, url: &str) -> Self {
        self.publish_links.push(PublishLink {
            label: label.to_string(),
            url: url.to_string(),
        });
        self
    }

    pub fn review_destination() -> Destination {
        Destination::Chat(TEST_REVIEW_CHAT)
    }

    pub fn publish_destination() -> Destination {
        Destination::Chat(TEST_PUBLISH_CHAT)
    }

    /// Fresh ServerDeps (empty store) sharing this builder's mock gateway
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.gateway.clone(),
            Destinations {
                review: Self::review_destination(),
                publish: Self::publish_destination(),
            },
            self.publish_links.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
