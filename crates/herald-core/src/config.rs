//! Filter configuration for the event classifier.
//!
//! A [`FilterConfig`] is built once at startup and passed by reference into
//! [`classify`](crate::classify); nothing in the decision logic reads
//! process state directly.

use crate::error::{CoreError, Result};

/// Default staleness threshold, in whole minutes.
pub const DEFAULT_MAX_AGE_MINUTES: u32 = 1;

/// Default message substring that bypasses staleness suppression.
pub const DEFAULT_ALWAYS_ALLOW_SUBSTRING: &str = "killed";

/// Static filter criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    target_reasons: Vec<String>,
    allowed_name_patterns: Vec<String>,
    max_age_minutes: u32,
    always_allow_substring: String,
}

impl FilterConfig {
    /// Creates a builder with a single target reason.
    #[must_use]
    pub fn builder(target_reason: impl Into<String>) -> FilterConfigBuilder {
        FilterConfigBuilder::new().target_reason(target_reason)
    }

    /// Returns the reasons that make an event noteworthy.
    #[must_use]
    pub fn target_reasons(&self) -> &[String] {
        &self.target_reasons
    }

    /// Returns the pod-name substrings. Empty means no restriction.
    #[must_use]
    pub fn allowed_name_patterns(&self) -> &[String] {
        &self.allowed_name_patterns
    }

    /// Returns the staleness threshold in minutes.
    #[must_use]
    pub const fn max_age_minutes(&self) -> u32 {
        self.max_age_minutes
    }

    /// Returns the substring that bypasses staleness suppression.
    #[must_use]
    pub fn always_allow_substring(&self) -> &str {
        &self.always_allow_substring
    }

    /// Returns true if `reason` is one of the target reasons.
    #[must_use]
    pub fn matches_reason(&self, reason: &str) -> bool {
        self.target_reasons.iter().any(|r| r == reason)
    }

    /// Returns true if `name` passes the pod-name allowlist.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.allowed_name_patterns.is_empty()
            || self
                .allowed_name_patterns
                .iter()
                .any(|p| name.contains(p.as_str()))
    }
}

/// Builder for [`FilterConfig`].
#[derive(Debug, Clone)]
pub struct FilterConfigBuilder {
    target_reasons: Vec<String>,
    allowed_name_patterns: Vec<String>,
    max_age_minutes: u32,
    always_allow_substring: String,
}

impl Default for FilterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterConfigBuilder {
    /// Creates a builder with no target reasons and default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target_reasons: Vec::new(),
            allowed_name_patterns: Vec::new(),
            max_age_minutes: DEFAULT_MAX_AGE_MINUTES,
            always_allow_substring: DEFAULT_ALWAYS_ALLOW_SUBSTRING.to_string(),
        }
    }

    /// Adds a target reason. Duplicates are ignored.
    #[must_use]
    pub fn target_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if !self.target_reasons.contains(&reason) {
            self.target_reasons.push(reason);
        }
        self
    }

    /// Adds several target reasons.
    #[must_use]
    pub fn target_reasons<I, S>(self, reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        reasons
            .into_iter()
            .fold(self, |builder, r| builder.target_reason(r))
    }

    /// Adds a pod-name pattern. Duplicates are ignored.
    #[must_use]
    pub fn name_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if !self.allowed_name_patterns.contains(&pattern) {
            self.allowed_name_patterns.push(pattern);
        }
        self
    }

    /// Adds several pod-name patterns.
    #[must_use]
    pub fn name_patterns<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        patterns
            .into_iter()
            .fold(self, |builder, p| builder.name_pattern(p))
    }

    /// Sets the staleness threshold.
    #[must_use]
    pub const fn max_age_minutes(mut self, minutes: u32) -> Self {
        self.max_age_minutes = minutes;
        self
    }

    /// Sets the substring that bypasses staleness suppression.
    #[must_use]
    pub fn always_allow_substring(mut self, substring: impl Into<String>) -> Self {
        self.always_allow_substring = substring.into();
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if no target reason was given, a
    /// target reason is empty, or the bypass substring is empty.
    pub fn build(self) -> Result<FilterConfig> {
        if self.target_reasons.is_empty() {
            return Err(CoreError::InvalidConfig {
                reason: "at least one target reason is required".to_string(),
            });
        }
        if self.target_reasons.iter().any(String::is_empty) {
            return Err(CoreError::InvalidConfig {
                reason: "target reason cannot be empty".to_string(),
            });
        }
        // Every message contains the empty string.
        if self.always_allow_substring.is_empty() {
            return Err(CoreError::InvalidConfig {
                reason: "always-allow substring cannot be empty".to_string(),
            });
        }

        Ok(FilterConfig {
            target_reasons: self.target_reasons,
            allowed_name_patterns: self.allowed_name_patterns,
            max_age_minutes: self.max_age_minutes,
            always_allow_substring: self.always_allow_substring,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = FilterConfig::builder("Pulled").build().unwrap();
        assert_eq!(config.target_reasons(), ["Pulled"]);
        assert!(config.allowed_name_patterns().is_empty());
        assert_eq!(config.max_age_minutes(), 1);
        assert_eq!(config.always_allow_substring(), "killed");
    }

    #[test]
    fn builder_overrides() {
        let config = FilterConfig::builder("Pulled")
            .target_reason("Killing")
            .name_patterns(["web-", "api-"])
            .max_age_minutes(5)
            .always_allow_substring("OOM")
            .build()
            .unwrap();
        assert_eq!(config.target_reasons(), ["Pulled", "Killing"]);
        assert_eq!(config.allowed_name_patterns(), ["web-", "api-"]);
        assert_eq!(config.max_age_minutes(), 5);
        assert_eq!(config.always_allow_substring(), "OOM");
    }

    #[test]
    fn duplicates_are_ignored() {
        let config = FilterConfigBuilder::new()
            .target_reasons(["Pulled", "Pulled"])
            .name_patterns(["web-", "web-"])
            .build()
            .unwrap();
        assert_eq!(config.target_reasons().len(), 1);
        assert_eq!(config.allowed_name_patterns().len(), 1);
    }

    #[test]
    fn no_target_reason_is_rejected() {
        let result = FilterConfigBuilder::new().build();
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn empty_target_reason_is_rejected() {
        let result = FilterConfig::builder("").build();
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn empty_always_allow_substring_is_rejected() {
        let result = FilterConfig::builder("Pulled")
            .always_allow_substring("")
            .build();
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn matches_reason_is_exact() {
        let config = FilterConfig::builder("Pulled")
            .target_reason("Killing")
            .build()
            .unwrap();
        assert!(config.matches_reason("Pulled"));
        assert!(config.matches_reason("Killing"));
        assert!(!config.matches_reason("pulled"));
        assert!(!config.matches_reason("Pulled "));
    }

    #[test]
    fn empty_patterns_match_any_name() {
        let config = FilterConfig::builder("Pulled").build().unwrap();
        assert!(config.matches_name("anything"));
        assert!(config.matches_name(""));
    }

    #[test]
    fn patterns_match_substrings_case_sensitively() {
        let config = FilterConfig::builder("Pulled")
            .name_patterns(["web-", "api"])
            .build()
            .unwrap();
        assert!(config.matches_name("web-7f8"));
        assert!(config.matches_name("public-api-0"));
        assert!(!config.matches_name("WEB-7f8"));
        assert!(!config.matches_name("db-7f8"));
    }
}
