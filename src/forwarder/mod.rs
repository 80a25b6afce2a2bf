//! Synchronous JSON forwarder for log events.
//!
//! This module defines [`LogForwarder`], an appender that serialises each
//! accepted [`LogEvent`](crate::log_record::LogEvent) to JSON and POSTs it to a
//! collector. Delivery happens on the calling thread; there is no queue,
//! batching or retry.
//!
//! # Payload handling
//!
//! - **Structured records** are serialised with `None` fields omitted.
//! - **Text** starting with [`DISCARD_SENTINEL_PREFIX`] is a notice from an
//!   upstream buffer that events were dropped, and is not forwarded.
//! - **Other text** is checked against the structured record shape. A text
//!   that fails the check is still sent verbatim after a warning.
//!
//! # Status codes
//!
//! [`LogForwarder::handle`] reports `0` for skipped events, the collector's
//! status on success, and [`NOT_ACCEPTABLE`] for any failure.

mod error;
mod handler;
mod serialise;
mod transport;


pub use error::{ForwardError, NOT_ACCEPTABLE, SKIPPED};
pub use handler::{Disposition, LogForwarder, is_forwarding};
#[cfg(all(test, feature = "log-compat"))]
pub(crate) use handler::ForwardingGuard;
pub use serialise::DISCARD_SENTINEL_PREFIX;
pub use transport::{HttpOutcome, UNDEFINED_USER_AGENT, USER_AGENT_PARAM};
