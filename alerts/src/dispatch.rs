//! Notification dispatch — best-effort fan-out to external channels.
//!
//! The dashboard channel is not dispatched here; it is served by the event
//! broadcaster unconditionally. Email/SMS go through an injected gateway
//! with a bounded per-send timeout and no retry: a failed send is logged
//! and lost, and never affects the alert that triggered it.

use pulse_types::{Alert, Channel, Severity};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Default bound on a single external send.
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 5;

/// What the external gateway receives for one send.
#[derive(Clone, Debug, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub area_name: String,
}

impl NotificationPayload {
    pub fn for_alert(alert: &Alert, area_name: &str) -> Self {
        Self {
            title: alert.title.clone(),
            message: alert.message.clone(),
            severity: alert.severity,
            area_name: area_name.to_string(),
        }
    }
}

/// A failed external send.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("send timed out")]
    Timeout,
    #[error("gateway error: {0}")]
    Gateway(String),
}

pub type SendFuture = Pin<Box<dyn Future<Output = Result<(), SendError>> + Send>>;

/// The external email/SMS gateway seam.
///
/// Implementations live outside the core (HTTP client to the provider); the
/// core only defines the payload shape and the async contract.
pub trait NotificationSender: Send + Sync {
    fn send(&self, channel: Channel, payload: NotificationPayload) -> SendFuture;
}

/// Per-dispatch accounting, for logs and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub failed: usize,
}

/// Fans an alert out to its external channels.
pub struct NotificationDispatcher {
    sender: Arc<dyn NotificationSender>,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(sender: Arc<dyn NotificationSender>, timeout: Duration) -> Self {
        Self { sender, timeout }
    }

    /// Attempt every external channel of the alert concurrently.
    ///
    /// Returns once all attempts have completed (successfully or not) so
    /// the caller can flip the alert Pending→Sent. Failures are logged,
    /// never propagated, and never abort the other channels.
    pub async fn dispatch(&self, alert: &Alert, area_name: &str) -> DispatchReport {
        let mut attempts = JoinSet::new();
        for channel in alert.external_channels() {
            let sender = Arc::clone(&self.sender);
            let payload = NotificationPayload::for_alert(alert, area_name);
            let timeout = self.timeout;
            attempts.spawn(async move {
                let result = match tokio::time::timeout(timeout, sender.send(channel, payload)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(SendError::Timeout),
                };
                (channel, result)
            });
        }

        let mut report = DispatchReport::default();
        while let Some(joined) = attempts.join_next().await {
            report.attempted += 1;
            match joined {
                Ok((channel, Ok(()))) => {
                    debug!(alert = %alert.id, %channel, "notification sent");
                }
                Ok((channel, Err(err))) => {
                    report.failed += 1;
                    warn!(alert = %alert.id, %channel, %err, "notification send failed");
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(alert = %alert.id, %err, "notification task panicked");
                }
            }
        }
        report
    }
}
