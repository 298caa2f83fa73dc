//! Core types for event notifications.
//!
//! This module provides the data model shared by the classifier and the formatter:
//! - [`EventRecord`]: A normalized cluster event, one per watch notification
//! - [`Color`]: The color hint attached to a notification
//! - [`Field`]: One title/value pair of a notification
//! - [`NotificationPayload`]: A structured notification ready for delivery

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A normalized cluster event.
///
/// Records are immutable once built. The builder guarantees
/// `last_seen >= first_seen` and `occurrence_count >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    source_component: String,
    involved_object_kind: String,
    name: String,
    namespace: String,
    reason: String,
    message: String,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    occurrence_count: u32,
}

impl EventRecord {
    /// Creates a builder for an event record.
    #[must_use]
    pub fn builder() -> EventRecordBuilder {
        EventRecordBuilder::default()
    }

    /// Returns the subsystem that emitted the event.
    #[must_use]
    pub fn source_component(&self) -> &str {
        &self.source_component
    }

    /// Returns the kind of the resource the event concerns.
    #[must_use]
    pub fn involved_object_kind(&self) -> &str {
        &self.involved_object_kind
    }

    /// Returns the name of the affected resource.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace of the affected resource.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the short categorical cause.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the event was first seen.
    #[must_use]
    pub const fn first_seen(&self) -> DateTime<Utc> {
        self.first_seen
    }

    /// Returns when the event was last seen.
    #[must_use]
    pub const fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Returns how many times the event has occurred.
    #[must_use]
    pub const fn occurrence_count(&self) -> u32 {
        self.occurrence_count
    }
}

/// Builder for [`EventRecord`].
#[derive(Debug, Clone, Default)]
pub struct EventRecordBuilder {
    source_component: String,
    involved_object_kind: String,
    name: String,
    namespace: String,
    reason: String,
    message: String,
    first_seen: Option<DateTime<Utc>>,
    last_seen: Option<DateTime<Utc>>,
    occurrence_count: Option<u32>,
}

impl EventRecordBuilder {
    /// Sets the emitting component.
    #[must_use]
    pub fn source_component(mut self, component: impl Into<String>) -> Self {
        self.source_component = component.into();
        self
    }

    /// Sets the kind of the involved object.
    #[must_use]
    pub fn involved_object_kind(mut self, kind: impl Into<String>) -> Self {
        self.involved_object_kind = kind.into();
        self
    }

    /// Sets the resource name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the resource namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the reason.
    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the first-seen timestamp.
    #[must_use]
    pub const fn first_seen(mut self, at: DateTime<Utc>) -> Self {
        self.first_seen = Some(at);
        self
    }

    /// Sets the last-seen timestamp.
    #[must_use]
    pub const fn last_seen(mut self, at: DateTime<Utc>) -> Self {
        self.last_seen = Some(at);
        self
    }

    /// Sets the occurrence count.
    #[must_use]
    pub const fn occurrence_count(mut self, count: u32) -> Self {
        self.occurrence_count = Some(count);
        self
    }

    /// Builds the record.
    ///
    /// A missing `last_seen` falls back to `first_seen`, then to the Unix
    /// epoch. A missing `first_seen` falls back to `last_seen`, and a
    /// `first_seen` later than `last_seen` is clamped to it. The count is
    /// raised to at least 1.
    #[must_use]
    pub fn build(self) -> EventRecord {
        let last_seen = self
            .last_seen
            .or(self.first_seen)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let first_seen = self.first_seen.map_or(last_seen, |t| t.min(last_seen));

        EventRecord {
            source_component: self.source_component,
            involved_object_kind: self.involved_object_kind,
            name: self.name,
            namespace: self.namespace,
            reason: self.reason,
            message: self.message,
            first_seen,
            last_seen,
            occurrence_count: self.occurrence_count.unwrap_or(1).max(1),
        }
    }
}

/// Color hint of a notification.
///
/// `None` leaves the color to the delivery layer's default rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// No explicit color.
    #[default]
    None,
    /// Success color.
    Good,
    /// Failure color.
    Danger,
}

impl Color {
    /// Returns the color as a string, or `None` when unset.
    #[must_use]
    pub const fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Good => Some("good"),
            Self::Danger => Some("danger"),
        }
    }

    /// Returns true if no color is set.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().unwrap_or("none"))
    }
}

/// A title/value pair of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// The field title.
    pub title: String,
    /// The field value.
    pub value: String,
    /// Whether the field is short enough to render side by side.
    pub short: bool,
}

impl Field {
    /// Creates a full-width field.
    #[must_use]
    pub fn long(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: false,
        }
    }

    /// Creates a short field.
    #[must_use]
    pub fn short(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: true,
        }
    }
}

/// A structured notification ready for delivery.
///
/// Serializes to the shape of a chat message attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    /// Plain text shown by clients that cannot render fields.
    #[serde(rename = "fallback")]
    pub fallback_text: String,
    /// Color hint.
    #[serde(skip_serializing_if = "Color::is_none")]
    pub color: Color,
    /// Ordered fields.
    pub fields: Vec<Field>,
}

impl NotificationPayload {
    /// Returns the value of the first field with the given title.
    #[must_use]
    pub fn field(&self, title: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.title == title)
            .map(|f| f.value.as_str())
    }
}
