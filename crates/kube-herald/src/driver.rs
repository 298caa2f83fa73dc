//! The watch loop.
//!
//! [`Driver`] reads one record at a time from an [`EventSource`], runs it
//! through the classifier and formatter, and awaits delivery before reading
//! the next record, so notifications go out in receipt order.

use chrono::{DateTime, Utc};
use herald_core::{EventRecord, FilterConfig, Suppression, ViewKind, classify, format_view};
use tracing::{debug, info};

use crate::error::Result;
use crate::sink::{DeliveryReceipt, NotificationSink};
use crate::watch::EventSource;

/// Source of the current time.
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records read from the source.
    pub received: u64,
    /// Notifications delivered.
    pub notified: u64,
    /// Records that did not produce a notification.
    pub suppressed: u64,
}

/// Sequential classify, format and deliver loop.
pub struct Driver<S, K> {
    source: S,
    sink: K,
    filter: FilterConfig,
    view: ViewKind,
    clock: Clock,
}

impl<S: EventSource, K: NotificationSink> Driver<S, K> {
    /// Creates a driver using the system clock and the composite view.
    #[must_use]
    pub fn new(source: S, sink: K, filter: FilterConfig) -> Self {
        Self {
            source,
            sink,
            filter,
            view: ViewKind::default(),
            clock: Box::new(Utc::now),
        }
    }

    /// Sets the payload view.
    #[must_use]
    pub fn with_view(mut self, view: ViewKind) -> Self {
        self.view = view;
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Returns the sink.
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Handles one record, returning the receipt if a notification was sent.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if delivery fails.
    pub async fn handle(&self, event: &EventRecord) -> Result<Option<DeliveryReceipt>> {
        let decision = classify(event, &self.filter, (self.clock)());

        if !decision.notify {
            match decision.suppression {
                Some(Suppression::Stale { age_minutes }) => {
                    info!(
                        age_minutes,
                        name = %event.name(),
                        "suppressed {age_minutes} minute old message: {}",
                        event.message()
                    );
                }
                other => {
                    debug!(
                        name = %event.name(),
                        reason = %event.reason(),
                        suppression = ?other,
                        "event not notified"
                    );
                }
            }
            return Ok(None);
        }

        let payload = format_view(event, decision.color, self.view);
        debug!(
            name = %event.name(),
            namespace = %event.namespace(),
            reason = %event.reason(),
            sink = %self.sink.name(),
            "delivering notification"
        );
        let receipt = self.sink.deliver(&payload).await?;
        info!(
            channel = %receipt.channel,
            ts = %receipt.timestamp,
            name = %event.name(),
            "notification delivered"
        );
        Ok(Some(receipt))
    }

    /// Runs until the source ends or an error occurs.
    ///
    /// # Errors
    ///
    /// Returns the first source or sink error; nothing is read after it.
    pub async fn run(mut self) -> Result<RunStats> {
        let mut stats = RunStats::default();

        while let Some(event) = self.source.next_event().await? {
            stats.received += 1;
            if self.handle(&event).await?.is_some() {
                stats.notified += 1;
            } else {
                stats.suppressed += 1;
            }
        }

        info!(
            received = stats.received,
            notified = stats.notified,
            suppressed = stats.suppressed,
            "end of event stream"
        );
        Ok(stats)
    }
}

impl<S, K> std::fmt::Debug for Driver<S, K>
where
    S: std::fmt::Debug,
    K: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("source", &self.source)
            .field("sink", &self.sink)
            .field("filter", &self.filter)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}
