//! Status monitoring use case.
//!
//! Polls the server's `/status` endpoint and folds the answer into a
//! [`StatusIndicator`]. The loop runs in the background for the whole chat
//! session and publishes through a `watch` channel, so readers always see
//! the latest value only.
//!
//! While the chat has a generation in flight the monitor reports
//! `Generating...` instead of asking the server, which is busy answering us.

use crate::ports::chat_gateway::{ChatGateway, TransportError};
use crate::use_cases::send_message::GenerationActivity;
use campus_chat_domain::{HealthReport, StatusIndicator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct StatusMonitor {
    gateway: Arc<dyn ChatGateway>,
    activity: Option<GenerationActivity>,
}

impl StatusMonitor {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            gateway,
            activity: None,
        }
    }

    /// Report `Generating...` whenever `activity` is active.
    pub fn with_activity(mut self, activity: GenerationActivity) -> Self {
        self.activity = Some(activity);
        self
    }

    /// Poll `/status` once.
    pub async fn check(&self) -> StatusIndicator {
        if self.activity.as_ref().is_some_and(GenerationActivity::is_active) {
            return StatusIndicator::generating();
        }

        match self.gateway.server_status().await {
            Ok(status) => {
                debug!(
                    "Status: {} (model loaded: {}, users {}/{})",
                    status.status, status.model.loaded, status.current_users, status.max_users
                );
                StatusIndicator::from_status(&status)
            }
            Err(e) => {
                warn!("Status check failed: {}", e);
                StatusIndicator::connection_error()
            }
        }
    }

    /// Query `/health`.
    pub async fn health(&self) -> Result<HealthReport, TransportError> {
        self.gateway.health().await
    }

    /// Poll immediately, then every `interval`, until cancelled or until
    /// every receiver is gone.
    pub async fn run(
        &self,
        interval: Duration,
        cancel: CancellationToken,
        indicator: watch::Sender<StatusIndicator>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                status = self.check() => status,
            };

            if indicator.send(status).is_err() {
                debug!("No status readers left, stopping monitor");
                break;
            }
        }
    }
}
