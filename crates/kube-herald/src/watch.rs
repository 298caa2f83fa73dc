//! Event watch stream.
//!
//! The orchestration API streams newline-delimited JSON frames of the form
//! `{"type": "ADDED", "object": {...}}`. [`WatchDecoder`] reassembles frames
//! from arbitrary byte chunks and [`WatchFrame::into_record`] normalizes the
//! wire event into an [`EventRecord`]. [`WatchSource`] ties both to an HTTP
//! response and implements [`EventSource`].

use std::future::Future;

use chrono::{DateTime, Utc};
use herald_core::EventRecord;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::config::WatchConfig;
use crate::error::{HeraldError, Result};

/// A sequential source of event records.
///
/// `Ok(None)` signals the normal end of input.
pub trait EventSource: Send {
    /// Returns the next event record.
    fn next_event(&mut self) -> impl Future<Output = Result<Option<EventRecord>>> + Send;
}

/// The kind of change a watch frame reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WatchEventType {
    /// An event object was created.
    Added,
    /// An event object was updated (typically a repeat).
    Modified,
    /// An event object expired.
    Deleted,
    /// A resource-version checkpoint with no payload.
    Bookmark,
    /// The watch failed; the object is a status.
    Error,
    /// A frame type this watcher does not know.
    #[serde(other)]
    Unknown,
}

/// One decoded frame of the watch stream.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchFrame {
    /// The kind of change.
    #[serde(rename = "type")]
    pub event_type: WatchEventType,
    /// The raw object; its schema depends on `event_type`.
    #[serde(default)]
    pub object: serde_json::Value,
}

impl WatchFrame {
    /// Converts the frame into an event record.
    ///
    /// Returns `Ok(None)` for frames that carry no new event.
    ///
    /// # Errors
    ///
    /// Returns `HeraldError::WatchStatus` for error frames and
    /// `HeraldError::Decode` if the event object is malformed.
    pub fn into_record(self) -> Result<Option<EventRecord>> {
        match self.event_type {
            WatchEventType::Added | WatchEventType::Modified => {
                let event: WireEvent = serde_json::from_value(self.object)?;
                Ok(Some(event.into_record()))
            }
            WatchEventType::Deleted | WatchEventType::Bookmark => {
                debug!(kind = ?self.event_type, "skipping watch frame");
                Ok(None)
            }
            WatchEventType::Error => {
                let status: WireStatus = serde_json::from_value(self.object)?;
                Err(HeraldError::WatchStatus {
                    code: status.code.unwrap_or_default(),
                    message: status
                        .message
                        .or(status.reason)
                        .unwrap_or_default(),
                })
            }
            WatchEventType::Unknown => {
                warn!("skipping watch frame of unknown type");
                Ok(None)
            }
        }
    }
}

/// Event object as served by the core/v1 events API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireEvent {
    metadata: WireMetadata,
    involved_object: WireObjectReference,
    source: WireSource,
    reason: Option<String>,
    message: Option<String>,
    first_timestamp: Option<DateTime<Utc>>,
    last_timestamp: Option<DateTime<Utc>>,
    event_time: Option<DateTime<Utc>>,
    count: Option<u32>,
    series: Option<WireSeries>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct WireMetadata {
    name: Option<String>,
    namespace: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct WireObjectReference {
    kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct WireSource {
    component: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct WireSeries {
    count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct WireStatus {
    code: Option<u16>,
    reason: Option<String>,
    message: Option<String>,
}

impl WireEvent {
    /// Normalizes the wire event.
    ///
    /// Newer producers leave `lastTimestamp` and `count` unset and report
    /// `eventTime` and `series.count` instead.
    fn into_record(self) -> EventRecord {
        let last_seen = self
            .last_timestamp
            .or(self.event_time)
            .or(self.first_timestamp)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let first_seen = self
            .first_timestamp
            .or(self.event_time)
            .unwrap_or(last_seen);
        let count = self
            .count
            .or_else(|| self.series.and_then(|s| s.count))
            .unwrap_or(1);

        EventRecord::builder()
            .source_component(self.source.component.unwrap_or_default())
            .involved_object_kind(self.involved_object.kind.unwrap_or_default())
            .name(self.metadata.name.unwrap_or_default())
            .namespace(self.metadata.namespace.unwrap_or_default())
            .reason(self.reason.unwrap_or_default())
            .message(self.message.unwrap_or_default())
            .first_seen(first_seen)
            .last_seen(last_seen)
            .occurrence_count(count)
            .build()
    }
}

/// Incremental decoder for newline-delimited watch frames.
#[derive(Debug, Default)]
pub struct WatchDecoder {
    buffer: Vec<u8>,
}

impl WatchDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk of the stream to the buffer.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Takes the next complete frame out of the buffer.
    ///
    /// Returns `Ok(None)` once no complete line is buffered. Lines are
    /// consumed one at a time, so frames ahead of a bad line are returned
    /// before its error.
    ///
    /// # Errors
    ///
    /// Returns `HeraldError::Decode` if the next complete line is not a valid
    /// frame. That line is dropped from the buffer.
    pub fn next_frame(&mut self) -> Result<Option<WatchFrame>> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(frame) = decode_line(&line)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Decodes whatever is left once the stream has ended.
    ///
    /// # Errors
    ///
    /// Returns `HeraldError::Decode` if the trailing bytes are not a valid frame.
    pub fn finish(&mut self) -> Result<Option<WatchFrame>> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }

    /// Returns the number of buffered bytes not yet forming a frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn decode_line(line: &[u8]) -> Result<Option<WatchFrame>> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(line).map(Some).map_err(|e| {
        let text = String::from_utf8_lossy(line);
        error!(error = %e, line = %text.trim_end(), "failed to decode watch frame");
        HeraldError::from(e)
    })
}

/// Event source backed by a streaming watch request.
#[derive(Debug)]
pub struct WatchSource {
    response: reqwest::Response,
    decoder: WatchDecoder,
    finished: bool,
}

impl WatchSource {
    /// Opens the watch stream.
    ///
    /// # Errors
    ///
    /// Returns `HeraldError::Http` if the request fails and
    /// `HeraldError::UnexpectedStatus` if the API does not answer 200.
    pub async fn connect(client: &reqwest::Client, config: &WatchConfig) -> Result<Self> {
        let url = config.events_url().clone();
        info!(url = %url, namespace = ?config.namespace(), "opening event watch");

        let response = client.get(url.clone()).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "watch request rejected");
            return Err(HeraldError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(Self {
            response,
            decoder: WatchDecoder::new(),
            finished: false,
        })
    }
}

impl EventSource for WatchSource {
    async fn next_event(&mut self) -> Result<Option<EventRecord>> {
        loop {
            if self.finished {
                return Ok(None);
            }
            let frame = match self.decoder.next_frame()? {
                Some(frame) => Some(frame),
                None => match self.response.chunk().await? {
                    Some(chunk) => {
                        self.decoder.feed(&chunk);
                        continue;
                    }
                    None => {
                        info!("event stream closed");
                        self.finished = true;
                        self.decoder.finish()?
                    }
                },
            };
            if let Some(record) = frame.map(WatchFrame::into_record).transpose()?.flatten() {
                return Ok(Some(record));
            }
        }
    }
}
