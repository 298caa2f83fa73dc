//! kube-herald - watches cluster events and forwards selected ones to Slack.
//!
//! The decision logic lives in [`herald_core`]; this crate supplies the
//! collaborators around it:
//!
//! - [`cli`] / [`config`]: arguments and environment, read once at startup
//! - [`watch`]: the streaming event watch and its frame decoder
//! - [`sink`] / [`slack`]: notification delivery
//! - [`driver`]: the sequential classify, format and deliver loop

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod sink;
pub mod slack;
pub mod watch;

pub use config::{AppConfig, SinkConfig, SlackConfig, WatchConfig};
pub use driver::{Clock, Driver, RunStats};
pub use error::{HeraldError, Result};
pub use sink::{DeliveryReceipt, LogSink, NotificationSink};
pub use slack::SlackSink;
pub use watch::{EventSource, WatchDecoder, WatchFrame, WatchSource};
