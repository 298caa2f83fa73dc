//! Slack delivery through `chat.postMessage`.
//!
//! Each notification is posted as a single message attachment carrying the
//! payload's fallback text, color and fields.

use herald_core::NotificationPayload;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SlackConfig;
use crate::error::{HeraldError, Result};
use crate::sink::{DeliveryReceipt, NotificationSink};

/// Request body of `chat.postMessage`.
#[derive(Debug, Serialize)]
pub struct PostMessageRequest<'a> {
    /// Destination channel.
    pub channel: &'a str,
    /// Top-level message text; the attachment carries the content.
    pub text: &'a str,
    /// Message attachments.
    pub attachments: &'a [NotificationPayload],
}

impl<'a> PostMessageRequest<'a> {
    /// Creates a request posting `payload` to `channel`.
    #[must_use]
    pub fn new(channel: &'a str, payload: &'a NotificationPayload) -> Self {
        Self {
            channel,
            text: "",
            attachments: std::slice::from_ref(payload),
        }
    }
}

/// Response body of `chat.postMessage`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Channel id the message was posted to.
    #[serde(default)]
    pub channel: Option<String>,
    /// Message timestamp.
    #[serde(default)]
    pub ts: Option<String>,
    /// Error code when `ok` is false.
    #[serde(default)]
    pub error: Option<String>,
}

impl PostMessageResponse {
    /// Converts the response into a receipt.
    ///
    /// # Errors
    ///
    /// Returns `HeraldError::Slack` if the API reported a failure.
    pub fn into_receipt(self) -> Result<DeliveryReceipt> {
        if !self.ok {
            return Err(HeraldError::Slack {
                error: self.error.unwrap_or_else(|| "unknown_error".to_string()),
            });
        }
        Ok(DeliveryReceipt::new(
            self.channel.unwrap_or_default(),
            self.ts.unwrap_or_default(),
        ))
    }
}

/// Sink posting notifications to a Slack channel.
#[derive(Debug, Clone)]
pub struct SlackSink {
    client: reqwest::Client,
    config: SlackConfig,
}

impl SlackSink {
    /// Creates a Slack sink.
    #[must_use]
    pub const fn new(client: reqwest::Client, config: SlackConfig) -> Self {
        Self { client, config }
    }

    /// Returns the destination channel.
    #[must_use]
    pub fn channel(&self) -> &str {
        self.config.channel()
    }
}

impl NotificationSink for SlackSink {
    fn name(&self) -> &str {
        "slack"
    }

    async fn deliver(&self, payload: &NotificationPayload) -> Result<DeliveryReceipt> {
        let request = PostMessageRequest::new(self.config.channel(), payload);
        debug!(channel = %self.config.channel(), fields = payload.fields.len(), "posting message");

        let response = self
            .client
            .post(self.config.post_message_url())
            .bearer_auth(self.config.token())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "slack api returned non-success status");
            return Err(HeraldError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.config.post_message_url(),
            });
        }

        let receipt = response.json::<PostMessageResponse>().await?.into_receipt()?;
        info!(
            channel = %receipt.channel,
            ts = %receipt.timestamp,
            "message sent"
        );
        Ok(receipt)
    }
}
