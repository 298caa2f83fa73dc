//! Runtime configuration.
//!
//! [`AppConfig`] is assembled once from the parsed [`Cli`] and validated
//! before anything connects:
//! - the [`FilterConfig`] handed to the classifier
//! - the watch endpoint ([`WatchConfig`])
//! - the delivery target ([`SinkConfig`])

use std::fmt;

use herald_core::{FilterConfig, FilterConfigBuilder, ViewKind};
use reqwest::Url;

use crate::cli::Cli;
use crate::error::{HeraldError, Result};

/// Orchestration API watch endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    namespace: Option<String>,
    events_url: Url,
}

impl WatchConfig {
    /// Creates a watch configuration for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns `HeraldError::Config` if the URL is invalid or cannot carry a path.
    pub fn new(api_url: &str, namespace: Option<String>) -> Result<Self> {
        let mut events_url = Url::parse(api_url)
            .map_err(|e| HeraldError::Config(format!("invalid api url '{api_url}': {e}")))?;
        let namespace = namespace
            .map(|ns| ns.trim().to_string())
            .filter(|ns| !ns.is_empty());

        {
            let mut segments = events_url.path_segments_mut().map_err(|()| {
                HeraldError::Config(format!("api url '{api_url}' cannot be a base url"))
            })?;
            segments.pop_if_empty().extend(["api", "v1"]);
            if let Some(ns) = &namespace {
                segments.extend(["namespaces", ns.as_str()]);
            }
            segments.push("events");
        }
        events_url.set_query(Some("watch=true"));

        Ok(Self {
            namespace,
            events_url,
        })
    }

    /// Returns the watched namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the event watch URL.
    #[must_use]
    pub const fn events_url(&self) -> &Url {
        &self.events_url
    }
}

/// Slack delivery settings.
#[derive(Clone, PartialEq, Eq)]
pub struct SlackConfig {
    token: String,
    channel: String,
    api_url: String,
}

impl SlackConfig {
    /// Creates Slack settings.
    ///
    /// # Errors
    ///
    /// Returns `HeraldError::Config` if the token or channel is empty.
    pub fn new(
        token: impl Into<String>,
        channel: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self> {
        let token = token.into();
        let channel = channel.into();
        if token.trim().is_empty() {
            return Err(HeraldError::Config(
                "SLACK_TOKEN is required unless --dry-run is set".to_string(),
            ));
        }
        if channel.trim().is_empty() {
            return Err(HeraldError::Config(
                "SLACK_CHANNEL is required unless --dry-run is set".to_string(),
            ));
        }

        Ok(Self {
            token,
            channel,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the bot token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the destination channel.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Returns the `chat.postMessage` endpoint.
    #[must_use]
    pub fn post_message_url(&self) -> String {
        format!("{}/chat.postMessage", self.api_url)
    }
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("channel", &self.channel)
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Where notifications go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkConfig {
    /// Post to Slack.
    Slack(SlackConfig),
    /// Log through tracing only.
    Log,
}

/// Validated process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Classifier criteria.
    pub filter: FilterConfig,
    /// Payload view.
    pub view: ViewKind,
    /// Watch endpoint.
    pub watch: WatchConfig,
    /// Delivery target.
    pub sink: SinkConfig,
}

impl AppConfig {
    /// Builds the configuration from parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns `HeraldError::Config` if a required value is missing or invalid.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let reasons = split_list(&cli.event_reason);
        if reasons.is_empty() {
            return Err(HeraldError::Config(
                "EVENT_REASON must name at least one reason".to_string(),
            ));
        }

        let filter = FilterConfigBuilder::new()
            .target_reasons(reasons)
            .name_patterns(split_list(&cli.pod_names))
            .max_age_minutes(cli.max_age_minutes)
            .always_allow_substring(cli.always_allow.clone())
            .build()?;

        let watch = WatchConfig::new(&cli.api_url, cli.namespace.clone())?;

        let sink = if cli.dry_run {
            SinkConfig::Log
        } else {
            SinkConfig::Slack(SlackConfig::new(
                cli.slack_token.clone().unwrap_or_default(),
                cli.slack_channel.clone().unwrap_or_default(),
                cli.slack_api_url.clone(),
            )?)
        };

        Ok(Self {
            filter,
            view: cli.view.into(),
            watch,
            sink,
        })
    }
}

/// Trims list entries and drops empty ones.
fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["kube-herald"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    mod watch_config_tests {
        use super::*;

        #[test]
        fn cluster_wide_url() {
            let config = WatchConfig::new("http://localhost:8001", None).unwrap();
            assert_eq!(
                config.events_url().as_str(),
                "http://localhost:8001/api/v1/events?watch=true"
            );
            assert_eq!(config.namespace(), None);
        }

        #[test]
        fn namespaced_url() {
            let config =
                WatchConfig::new("http://localhost:8001", Some("kube-system".to_string())).unwrap();
            assert_eq!(
                config.events_url().as_str(),
                "http://localhost:8001/api/v1/namespaces/kube-system/events?watch=true"
            );
            assert_eq!(config.namespace(), Some("kube-system"));
        }

        #[test]
        fn trailing_slash_and_base_path() {
            let config = WatchConfig::new("https://proxy.internal/k8s/", None).unwrap();
            assert_eq!(
                config.events_url().as_str(),
                "https://proxy.internal/k8s/api/v1/events?watch=true"
            );
        }

        #[test]
        fn blank_namespace_is_cluster_wide() {
            let config = WatchConfig::new("http://localhost:8001", Some("  ".to_string())).unwrap();
            assert_eq!(config.namespace(), None);
        }

        #[test]
        fn invalid_url_is_rejected() {
            let result = WatchConfig::new("not a url", None);
            assert!(matches!(result, Err(HeraldError::Config(_))));
        }

        #[test]
        fn non_base_url_is_rejected() {
            let result = WatchConfig::new("mailto:ops@example.com", None);
            assert!(matches!(result, Err(HeraldError::Config(_))));
        }
    }

    mod slack_config_tests {
        use super::*;

        #[test]
        fn post_message_url_strips_trailing_slash() {
            let config = SlackConfig::new("xoxb-1", "C123", "https://slack.com/api/").unwrap();
            assert_eq!(
                config.post_message_url(),
                "https://slack.com/api/chat.postMessage"
            );
        }

        #[test]
        fn empty_token_is_rejected() {
            let result = SlackConfig::new("", "C123", "https://slack.com/api");
            assert!(matches!(result, Err(HeraldError::Config(_))));
        }

        #[test]
        fn empty_channel_is_rejected() {
            let result = SlackConfig::new("xoxb-1", " ", "https://slack.com/api");
            assert!(matches!(result, Err(HeraldError::Config(_))));
        }

        #[test]
        fn debug_redacts_token() {
            let config = SlackConfig::new("xoxb-secret", "C123", "https://slack.com/api").unwrap();
            let debug = format!("{config:?}");
            assert!(debug.contains("[REDACTED]"));
            assert!(!debug.contains("xoxb-secret"));
        }
    }

    mod app_config_tests {
        use super::*;

        #[test]
        fn dry_run_uses_log_sink() {
            let config = AppConfig::from_cli(&cli(&["--event-reason", "Pulled", "--dry-run"])).unwrap();
            assert_eq!(config.sink, SinkConfig::Log);
            assert_eq!(config.filter.target_reasons(), ["Pulled"]);
            assert_eq!(config.view, ViewKind::Composite);
        }

        #[test]
        fn slack_sink_requires_token() {
            let result = AppConfig::from_cli(&cli(&[
                "--event-reason",
                "Pulled",
                "--slack-channel",
                "C123",
            ]));
            assert!(matches!(result, Err(HeraldError::Config(_))));
        }

        #[test]
        fn slack_sink_is_built() {
            let config = AppConfig::from_cli(&cli(&[
                "--event-reason",
                "Pulled",
                "--slack-channel",
                "C123",
                "--slack-token",
                "xoxb-1",
            ]))
            .unwrap();
            match config.sink {
                SinkConfig::Slack(slack) => {
                    assert_eq!(slack.channel(), "C123");
                    assert_eq!(slack.token(), "xoxb-1");
                }
                SinkConfig::Log => panic!("expected slack sink"),
            }
        }

        #[test]
        fn lists_are_trimmed_and_blank_entries_dropped() {
            let config = AppConfig::from_cli(&cli(&[
                "--event-reason",
                " Pulled , ,Killing",
                "--pod-names",
                "web-, ,api-,",
                "--dry-run",
            ]))
            .unwrap();
            assert_eq!(config.filter.target_reasons(), ["Pulled", "Killing"]);
            assert_eq!(config.filter.allowed_name_patterns(), ["web-", "api-"]);
        }

        #[test]
        fn blank_reason_list_is_rejected() {
            let result = AppConfig::from_cli(&cli(&["--event-reason", " , ", "--dry-run"]));
            assert!(matches!(result, Err(HeraldError::Config(_))));
        }

        #[test]
        fn empty_always_allow_is_rejected() {
            let result = AppConfig::from_cli(&cli(&[
                "--event-reason",
                "Pulled",
                "--always-allow",
                "",
                "--dry-run",
            ]));
            assert!(matches!(result, Err(HeraldError::Core(_))));
        }

        #[test]
        fn thresholds_are_forwarded() {
            let config = AppConfig::from_cli(&cli(&[
                "--event-reason",
                "Pulled",
                "--max-age-minutes",
                "7",
                "--always-allow",
                "OOMKilled",
                "--view",
                "general",
                "--dry-run",
            ]))
            .unwrap();
            assert_eq!(config.filter.max_age_minutes(), 7);
            assert_eq!(config.filter.always_allow_substring(), "OOMKilled");
            assert_eq!(config.view, ViewKind::General);
        }
    }
}
