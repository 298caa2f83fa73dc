//! Event classification and notification formatting for kube-herald.
//!
//! `herald-core` holds the decision pipeline of the watcher with no I/O:
//!
//! - **Classification**: [`classify`] decides whether a cluster event is worth
//!   a notification (reason match, pod-name allowlist, repeat and staleness
//!   suppression) and picks a color hint
//! - **Formatting**: [`format`] turns an event into a structured
//!   [`NotificationPayload`] ready for a chat sink
//! - **Configuration**: [`FilterConfig`] carries the fixed filter criteria,
//!   built once at startup
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use herald_core::{classify, format, EventRecord, FilterConfig};
//!
//! let config = FilterConfig::builder("Pulled")
//!     .name_pattern("web-")
//!     .build()
//!     .unwrap();
//!
//! let now = Utc::now();
//! let event = EventRecord::builder()
//!     .name("web-7f8")
//!     .namespace("prod")
//!     .reason("Pulled")
//!     .message("Successfully pulled image nginx:1.2")
//!     .last_seen(now)
//!     .build();
//!
//! let decision = classify(&event, &config, now);
//! assert!(decision.notify);
//!
//! let payload = format(&event, decision.color);
//! assert_eq!(payload.field("Deployed-Image-Tag"), Some("nginx:1.2"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod formatter;
pub mod types;

// Re-export main types at crate root
pub use classifier::{Decision, Suppression, age_minutes, classify};
pub use config::{
    DEFAULT_ALWAYS_ALLOW_SUBSTRING, DEFAULT_MAX_AGE_MINUTES, FilterConfig, FilterConfigBuilder,
};
pub use error::{CoreError, Result};
pub use formatter::{ViewKind, deployed_image_tag, format, format_view, resolve_color};
pub use types::{Color, EventRecord, EventRecordBuilder, Field, NotificationPayload};
