//! Long-polling update loop, used when no public webhook URL is configured.
//!
//! ```text
//! UpdatePoller
//!     │
//!     ├─► getUpdates(offset, timeout)   (blocks up to `poll_timeout_secs`)
//!     ├─► handle every update of the batch concurrently
//!     └─► offset = last update_id + 1
//! ```
//!
//! # Example
//!
//! ```ignore
//! let poller = UpdatePoller::new(source, deps);
//! let stop = poller.shutdown_handle();
//! tokio::spawn(poller.run());
//! axum::serve(listener, app)
//!     .with_graceful_shutdown(shutdown_on(ctrl_c(), Some(stop)))
//!     .await?;
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use tracing::{debug, error, info};

use crate::domains::chat::handle_update;
use crate::kernel::{BaseUpdateSource, ServerDeps};

#[derive(Debug, Clone)]
pub struct UpdatePollerConfig {
    /// Seconds the platform may hold a getUpdates request open
    pub poll_timeout_secs: u32,
    /// Pause after a failed fetch before trying again
    pub error_backoff: Duration,
}

impl Default for UpdatePollerConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 30,
            error_backoff: Duration::from_secs(3),
        }
    }
}

pub struct UpdatePoller {
    source: Arc<dyn BaseUpdateSource>,
    deps: Arc<ServerDeps>,
    config: UpdatePollerConfig,
    shutdown: Arc<AtomicBool>,
}

impl UpdatePoller {
    pub fn new(source: Arc<dyn BaseUpdateSource>, deps: Arc<ServerDeps>) -> Self {
        Self::with_config(source, deps, UpdatePollerConfig::default())
    }

    pub fn with_config(
        source: Arc<dyn BaseUpdateSource>,
        deps: Arc<ServerDeps>,
        config: UpdatePollerConfig,
    ) -> Self {
        Self {
            source,
            deps,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Call `store(true, Ordering::SeqCst)` on the returned Arc to stop the loop
    /// after the batch in flight.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub async fn run(self) -> Result<()> {
        info!(
            poll_timeout_secs = self.config.poll_timeout_secs,
            "update poller starting"
        );

        // A registered webhook makes getUpdates fail with a conflict
        if let Err(e) = self.source.prepare().await {
            error!(error = %e, "failed to clear webhook before polling");
        }

        let mut offset: Option<i64> = None;

        loop {
            if self.is_shutdown_requested() {
                break;
            }

            let updates = match self
                .source
                .fetch_updates(offset, self.config.poll_timeout_secs)
                .await
            {
                Ok(updates) => updates,
                Err(e) => {
                    error!(error = %e, "failed to fetch updates");
                    tokio::time::sleep(self.config.error_backoff).await;
                    continue;
                }
            };

            if updates.is_empty() {
                continue;
            }

            debug!(count = updates.len(), "received updates");

            if let Some(last) = updates.iter().map(|u| u.update_id).max() {
                offset = Some(last + 1);
            }

            let deps = &self.deps;
            join_all(updates.into_iter().map(|update| handle_update(update, deps))).await;
        }

        info!("update poller stopped");
        Ok(())
    }
}

/// Resolve once `signal` fires, after telling the poller to stop.
///
/// Passed to `axum::serve(..).with_graceful_shutdown(..)` so one signal stops
/// both the HTTP server and the poller.
pub async fn shutdown_on<F>(signal: F, poller: Option<Arc<AtomicBool>>)
where
    F: Future<Output = ()>,
{
    signal.await;
    info!("received shutdown signal");
    if let Some(poller) = poller {
        poller.store(true, Ordering::SeqCst);
    }
}

/// Completes on Ctrl+C
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
