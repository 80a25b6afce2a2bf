//! Logging appender that forwards events as JSON to a REST collector.
//!
//! [`LogForwarder`] accepts [`LogEvent`]s, drops those below its severity
//! threshold and POSTs the rest to the configured collector. The collector URL
//! comes from the client properties file when present, otherwise from the
//! host configuration supplied through [`ForwarderBuilder`].

pub mod config;
pub mod diagnostic_context;
mod file_config;
pub mod forwarder;
pub mod handler;
pub mod handlers;
pub mod level;
#[cfg(feature = "log-compat")]
pub mod log_compat;
pub mod log_record;
pub mod rate_limited_warner;
pub mod structured_record;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use config::{ConfigError, ForwarderConfig};
pub use forwarder::{Disposition, ForwardError, HttpOutcome, LogForwarder};
pub use handler::Appender;
pub use handlers::{AppenderBuilderTrait, BuildError, ForwarderBuilder};
pub use level::Level;
pub use log_record::{LogEvent, Payload};
pub use structured_record::StructuredRecord;
