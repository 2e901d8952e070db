//! Test harness for integration testing.
//!
//! Every test gets fresh in-memory state wired to a recording gateway, so no
//! network access is needed. The Telegram client points at an unroutable
//! address and is only used by the webhook management routes.

use std::sync::Arc;

use axum::Router;
use submission_core::common::SubmissionId;
use submission_core::domains::submissions::Submission;
use submission_core::kernel::{Button, MockGateway, ServerDeps, TestDependencies};
use submission_core::server::{build_app, AppState};
use telegram::{TelegramOptions, TelegramService};
use test_context::AsyncTestContext;

pub const TEST_TOKEN: &str = "123456:TEST-TOKEN";

/// Test harness holding the dependencies a test drives and inspects.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     handle_update(text_update(1, "/submit"), &ctx.deps).await;
/// }
/// ```
pub struct TestHarness {
    pub test_deps: TestDependencies,
    pub deps: Arc<ServerDeps>,
    pub telegram: Arc<TelegramService>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::with_gateway(MockGateway::new())
    }

    async fn teardown(self) {
        // In-memory state is dropped with the harness
    }
}

impl TestHarness {
    pub fn with_gateway(gateway: MockGateway) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let test_deps = TestDependencies::new()
            .with_gateway(gateway)
            .with_publish_link("交流群", "https://t.me/example_group");
        let deps = Arc::new(test_deps.server_deps());

        let telegram = Arc::new(TelegramService::new(TelegramOptions {
            bot_token: TEST_TOKEN.to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
        }));

        Self {
            test_deps,
            deps,
            telegram,
        }
    }

    pub fn gateway(&self) -> &MockGateway {
        &self.test_deps.gateway
    }

    /// Router in polling mode (no webhook endpoint configured)
    pub fn router(&self) -> Router {
        build_app(AppState {
            deps: self.deps.clone(),
            telegram: self.telegram.clone(),
            api_token: TEST_TOKEN.to_string(),
            webhook_endpoint: None,
        })
    }

    /// Pending submissions currently in the store
    pub fn pending(&self) -> Vec<Submission> {
        self.deps.store.snapshot()
    }

    /// Decision payloads attached to the most recent review prompt
    pub fn last_decision_payloads(&self) -> Vec<String> {
        self.gateway()
            .buttons_to(&TestDependencies::review_destination())
            .last()
            .map(|buttons| {
                buttons
                    .iter()
                    .filter_map(|button| match button {
                        Button::Action { payload, .. } => Some(payload.clone()),
                        Button::Link { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn only_pending_id(&self) -> SubmissionId {
        let pending = self.pending();
        assert_eq!(pending.len(), 1, "expected exactly one pending submission");
        pending[0].id
    }
}
