//! Public forwarder type exported by the crate.

use std::cell::Cell;

use log::{debug, error};
use parking_lot::Mutex;
use ureq::Agent;

use crate::{
    config::ForwarderConfig, handler::Appender, level::Level, log_record::LogEvent,
    rate_limited_warner::RateLimitedWarner,
};

use super::{
    error::{ForwardError, SKIPPED},
    serialise::prepare_body,
    transport::{HttpOutcome, build_agent, post_json, user_agent},
};

thread_local! {
    static FORWARDING: Cell<bool> = const { Cell::new(false) };
}

/// Return `true` while the current thread is inside [`LogForwarder::handle`].
///
/// Log bridges consult this to avoid feeding the forwarder's own diagnostics,
/// or those of the HTTP client, back into it.
pub fn is_forwarding() -> bool {
    FORWARDING.with(Cell::get)
}

pub(crate) struct ForwardingGuard {
    previous: bool,
}

impl ForwardingGuard {
    pub(crate) fn enter() -> Self {
        Self {
            previous: FORWARDING.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for ForwardingGuard {
    fn drop(&mut self) {
        FORWARDING.with(|flag| flag.set(self.previous));
    }
}

/// What happened to an event that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The event was below the severity threshold.
    FilteredOut,
    /// The event was a discard notice from an upstream buffer.
    Discarded,
    /// The event was delivered.
    Sent(HttpOutcome),
}

impl Disposition {
    /// Status code reported to the caller.
    pub fn status(&self) -> u16 {
        match self {
            Self::FilteredOut | Self::Discarded => SKIPPED,
            Self::Sent(outcome) => outcome.status,
        }
    }
}

/// Appender forwarding events to a REST collector as JSON.
///
/// Each accepted event is POSTed synchronously on the calling thread using a
/// shared [`ureq::Agent`]. Failures never reach the caller; they are logged
/// and reported as [`NOT_ACCEPTABLE`](super::NOT_ACCEPTABLE).
pub struct LogForwarder {
    config: ForwarderConfig,
    agent: Mutex<Option<Agent>>,
    no_destination: Option<RateLimitedWarner>,
}

impl LogForwarder {
    /// Construct the forwarder from a configuration object.
    pub fn new(config: ForwarderConfig) -> Self {
        let agent = build_agent(&config);
        let no_destination = config.warn_interval.map(RateLimitedWarner::new);
        Self {
            config,
            agent: Mutex::new(Some(agent)),
            no_destination,
        }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Collector URL, if configured.
    pub fn url(&self) -> Option<&str> {
        self.config.url_template()
    }

    /// Minimum severity forwarded.
    pub fn threshold(&self) -> Level {
        self.config.threshold
    }

    /// Return `true` while an HTTP client is held.
    pub fn has_client(&self) -> bool {
        self.agent.lock().is_some()
    }

    /// Filter, serialise and deliver `event`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::NoDestination`] when no URL is configured, and
    /// the serialisation or transport failure otherwise. Text payloads that
    /// fail validation are still sent.
    pub fn send(&self, event: &LogEvent) -> Result<Disposition, ForwardError> {
        let Some(url) = self.config.url_template() else {
            return Err(ForwardError::NoDestination);
        };
        if !event.level.is_as_severe_as(self.config.threshold) {
            return Ok(Disposition::FilteredOut);
        }
        let Some(body) = prepare_body(&event.payload)? else {
            return Ok(Disposition::Discarded);
        };

        let agent = self.agent();
        debug!("Posting log event to URL [{url}]");
        post_json(&agent, url, &body, user_agent(event)).map(Disposition::Sent)
    }

    /// Clone the shared agent, rebuilding it if [`shutdown`](Appender::shutdown)
    /// released it.
    fn agent(&self) -> Agent {
        self.agent
            .lock()
            .get_or_insert_with(|| build_agent(&self.config))
            .clone()
    }

    fn coalesced_no_destination_error(&self, count: u64) {
        error!(
            "No 'urlTemplate' for [{}]; dropped {count} log events",
            self.config.name
        );
    }

    fn report_no_destination(&self) {
        let Some(warner) = &self.no_destination else {
            error!("No 'urlTemplate' for [{}]", self.config.name);
            return;
        };
        warner.record_drop();
        warner.warn_if_due(|count| self.coalesced_no_destination_error(count));
    }
}

impl Appender for LogForwarder {
    fn handle(&self, event: &LogEvent) -> u16 {
        let _guard = ForwardingGuard::enter();
        match self.send(event) {
            Ok(disposition) => disposition.status(),
            Err(ForwardError::NoDestination) => {
                self.report_no_destination();
                SKIPPED
            }
            Err(err) => {
                error!(
                    "Could not send message from {} [{}],\nMessage: {}\nCause: {err}",
                    self.config.name,
                    self.config.url_template().unwrap_or_default(),
                    event.payload
                );
                err.status_code()
            }
        }
    }

    fn shutdown(&self) {
        if let Some(warner) = &self.no_destination {
            warner.flush(|count| self.coalesced_no_destination_error(count));
        }
        self.agent.lock().take();
    }
}

impl std::fmt::Debug for LogForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogForwarder")
            .field("config", &self.config)
            .field("has_client", &self.has_client())
            .finish()
    }
}
