//! An appender that accumulates events in memory for test assertions.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::handler::Appender;
use crate::log_record::LogEvent;

/// Appender that stores every event it receives for later inspection.
#[derive(Clone, Default)]
pub struct CollectingAppender {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl CollectingAppender {
    /// Create a new empty appender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot of all events received so far.
    pub fn collected(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }
}

impl Appender for CollectingAppender {
    fn handle(&self, event: &LogEvent) -> u16 {
        self.events.lock().push(event.clone());
        200
    }

    fn shutdown(&self) {}
}
