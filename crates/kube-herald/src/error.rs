//! Error types for kube-herald.

use thiserror::Error;

/// Slack API error codes worth retrying.
const TRANSIENT_SLACK_ERRORS: &[&str] = &["ratelimited", "request_timeout", "service_unavailable"];

/// Errors that can stop the watcher.
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The orchestration API answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// A watch frame could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The watch stream reported an error status.
    #[error("watch error {code}: {message}")]
    WatchStatus {
        /// The status code carried by the frame.
        code: u16,
        /// The status message.
        message: String,
    },

    /// The Slack API rejected a message.
    #[error("slack error: {error}")]
    Slack {
        /// The Slack error code.
        error: String,
    },

    /// Core configuration error.
    #[error(transparent)]
    Core(#[from] herald_core::CoreError),
}

impl HeraldError {
    /// Returns true if the failure is likely to clear up on its own.
    ///
    /// The watcher still stops on any error; this classification is logged
    /// so that a retry policy can be layered on later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_body(),
            Self::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            Self::WatchStatus { code, .. } => *code == 410 || *code == 429 || *code >= 500,
            Self::Slack { error } => TRANSIENT_SLACK_ERRORS.contains(&error.as_str()),
            Self::Config(_) | Self::Decode(_) | Self::Core(_) => false,
        }
    }
}

/// Result type for kube-herald operations.
pub type Result<T> = std::result::Result<T, HeraldError>;
