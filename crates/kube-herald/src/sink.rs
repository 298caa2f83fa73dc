//! Notification sinks.
//!
//! This module provides the [`NotificationSink`] trait and the [`LogSink`]
//! used for dry runs. The Slack implementation lives in [`crate::slack`].

use std::future::Future;

use chrono::Utc;
use herald_core::NotificationPayload;
use tracing::info;

use crate::error::Result;

/// Acknowledgment of a delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// The channel the notification landed in.
    pub channel: String,
    /// The message timestamp assigned by the sink.
    pub timestamp: String,
}

impl DeliveryReceipt {
    /// Creates a receipt.
    #[must_use]
    pub fn new(channel: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Trait for notification sinks.
///
/// Each call delivers exactly one payload to a single destination.
pub trait NotificationSink: Send {
    /// Returns the name of this sink.
    fn name(&self) -> &str;

    /// Delivers a payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload could not be delivered.
    fn deliver(
        &self,
        payload: &NotificationPayload,
    ) -> impl Future<Output = Result<DeliveryReceipt>> + Send;
}

/// A sink that logs notifications instead of sending them.
#[derive(Debug, Clone)]
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Creates a log sink.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new("log")
    }
}

impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, payload: &NotificationPayload) -> Result<DeliveryReceipt> {
        let fields: Vec<String> = payload
            .fields
            .iter()
            .map(|f| format!("{}={}", f.title, f.value))
            .collect();
        info!(
            sink = %self.name,
            color = %payload.color,
            fields = ?fields,
            "NOTIFY {}",
            payload.fallback_text
        );

        let now = Utc::now();
        Ok(DeliveryReceipt::new(
            self.name.clone(),
            format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros()),
        ))
    }
}
