//! Notification decisions for incoming events.
//!
//! [`classify`] runs a fixed sequence of gates over an [`EventRecord`]:
//!
//! 1. the reason must be one of the configured target reasons;
//! 2. the resource name must contain one of the allowed patterns, if any;
//! 3. the event must not have repeated;
//! 4. the event must be recent, unless its message contains the bypass
//!    substring.
//!
//! Passing gates 1 and 2 colors the notification [`Color::Good`]. Gates 3 and
//! 4 can only suppress a notification, never enable one.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::config::FilterConfig;
use crate::types::{Color, EventRecord};

/// Why an event was not notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// The reason is not a target reason.
    ReasonMismatch,
    /// The name matches none of the allowed patterns.
    NameMismatch,
    /// The event has occurred more than once.
    Repeated {
        /// The occurrence count.
        count: u32,
    },
    /// The event is older than the staleness threshold.
    Stale {
        /// Whole minutes since the event was last seen.
        age_minutes: i64,
    },
}

impl fmt::Display for Suppression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReasonMismatch => write!(f, "reason mismatch"),
            Self::NameMismatch => write!(f, "name mismatch"),
            Self::Repeated { count } => write!(f, "repeated {count} times"),
            Self::Stale { age_minutes } => write!(f, "{age_minutes} minutes old"),
        }
    }
}

/// The outcome of classifying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether a notification should be sent.
    pub notify: bool,
    /// Color hint for the formatter.
    pub color: Color,
    /// The first gate that rejected the event.
    pub suppression: Option<Suppression>,
}

/// Returns the whole minutes from `last_seen` to `now`, truncated toward zero.
#[must_use]
pub fn age_minutes(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - last_seen).num_minutes()
}

/// Decides whether `event` should be notified.
#[must_use]
pub fn classify(event: &EventRecord, config: &FilterConfig, now: DateTime<Utc>) -> Decision {
    let mut suppression = None;
    let mut color = Color::None;

    let mut notify = if config.matches_reason(event.reason()) {
        if config.matches_name(event.name()) {
            color = Color::Good;
            true
        } else {
            suppression = Some(Suppression::NameMismatch);
            false
        }
    } else {
        suppression = Some(Suppression::ReasonMismatch);
        false
    };

    // TODO: let back-off repeats through once the repeat policy distinguishes them.
    let count = event.occurrence_count();
    if count > 1 {
        notify = false;
        suppression.get_or_insert(Suppression::Repeated { count });
    }

    let age = age_minutes(event.last_seen(), now);
    if age > i64::from(config.max_age_minutes())
        && !event.message().contains(config.always_allow_substring())
    {
        notify = false;
        suppression.get_or_insert(Suppression::Stale { age_minutes: age });
    }

    trace!(
        name = %event.name(),
        reason = %event.reason(),
        notify,
        suppression = ?suppression,
        "classified event"
    );

    Decision {
        notify,
        color,
        suppression,
    }
}
