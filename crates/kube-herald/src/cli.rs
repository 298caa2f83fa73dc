//! Command-line arguments with clap.
//!
//! Every option can also be set through the environment, which is how the
//! watcher is usually configured when it runs as a sidecar next to
//! `kubectl proxy`.

use clap::{Parser, ValueEnum};
use herald_core::{DEFAULT_ALWAYS_ALLOW_SUBSTRING, DEFAULT_MAX_AGE_MINUTES, ViewKind};

/// Default orchestration API base URL (a local `kubectl proxy`).
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// Default Slack Web API base URL.
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// kube-herald - forward selected cluster events to Slack.
#[derive(Parser, Debug, Clone)]
#[command(name = "kube-herald")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Event reasons to notify on (comma-separated).
    #[arg(long, env = "EVENT_REASON", value_delimiter = ',', required = true)]
    pub event_reason: Vec<String>,

    /// Pod-name substrings to restrict notifications to (comma-separated).
    #[arg(long, env = "POD_NAMES", value_delimiter = ',')]
    pub pod_names: Vec<String>,

    /// Slack channel to post to.
    #[arg(long, env = "SLACK_CHANNEL")]
    pub slack_channel: Option<String>,

    /// Slack bot token.
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub slack_token: Option<String>,

    /// Namespace to watch (all namespaces when unset).
    #[arg(long, env = "EVENT_NAMESPACE")]
    pub namespace: Option<String>,

    /// Orchestration API base URL.
    #[arg(long, env = "KUBE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Slack Web API base URL.
    #[arg(long, env = "SLACK_API_URL", default_value = DEFAULT_SLACK_API_URL)]
    pub slack_api_url: String,

    /// Events last seen more than this many minutes ago are not notified.
    #[arg(long, env = "MAX_AGE_MINUTES", default_value_t = DEFAULT_MAX_AGE_MINUTES)]
    pub max_age_minutes: u32,

    /// Message substring that is notified regardless of age.
    #[arg(long, env = "ALWAYS_ALLOW", default_value = DEFAULT_ALWAYS_ALLOW_SUBSTRING)]
    pub always_allow: String,

    /// Fields to include in notifications.
    #[arg(long, env = "NOTIFY_VIEW", value_enum, default_value_t = View::Composite)]
    pub view: View,

    /// Log notifications instead of posting them.
    #[arg(long, env = "DRY_RUN")]
    pub dry_run: bool,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Notification view options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum View {
    /// Deployment and general fields.
    #[default]
    Composite,
    /// Pod name and deployed image tag.
    CustomDeploy,
    /// Namespace, message, object, name, reason and component.
    General,
}

impl From<View> for ViewKind {
    fn from(view: View) -> Self {
        match view {
            View::Composite => Self::Composite,
            View::CustomDeploy => Self::CustomDeploy,
            View::General => Self::General,
        }
    }
}

/// Log output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}
