//! Log event representation consumed by the forwarder.
//!
//! A [`LogEvent`] is created by the host once per call site, handed to a
//! [`LogForwarder`](crate::forwarder::LogForwarder) and then discarded. The
//! payload is either free text or a [`StructuredRecord`] that is serialised
//! directly to JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

use crate::level::Level;
use crate::structured_record::StructuredRecord;

/// Message carried by an event.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Free-form text, usually a JSON document produced by the caller.
    Text(String),
    /// Pre-built record serialised without its `None` fields.
    Record(StructuredRecord),
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<StructuredRecord> for Payload {
    fn from(value: StructuredRecord) -> Self {
        Self::Record(value)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Record(record) => write!(f, "{record:?}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogEvent {
    /// Name of the logger that produced the event.
    pub logger: String,
    /// Severity of the event.
    pub level: Level,
    /// The message content.
    pub payload: Payload,
    /// Diagnostic context captured when the event was created.
    pub context: BTreeMap<String, String>,
    /// Time the event was created.
    pub timestamp: SystemTime,
}

impl LogEvent {
    /// Construct an event with an empty diagnostic context.
    pub fn new(logger: &str, level: Level, payload: impl Into<Payload>) -> Self {
        Self {
            logger: logger.to_owned(),
            level,
            payload: payload.into(),
            context: BTreeMap::new(),
            timestamp: SystemTime::now(),
        }
    }

    /// Attach a single diagnostic context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Replace the diagnostic context wholesale.
    pub fn with_context_map(mut self, context: BTreeMap<String, String>) -> Self {
        self.context = context;
        self
    }

    /// Look up a diagnostic context entry.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.payload)
    }
}
