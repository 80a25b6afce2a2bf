//! Compatibility bridge for the Rust `log` crate.
//!
//! This module provides [`ForwardingLogger`], an implementation of `log::Log`
//! that turns each `log::Record` into a text [`LogEvent`] and hands it to an
//! [`Appender`]. The current thread's diagnostic context is copied into every
//! event. [`install`] makes the bridge the global Rust logger.
//!
//! Records raised while a forwarder is already handling an event on the same
//! thread cannot go back through the bridge. They are handed to a fallback
//! logger instead, [`StderrDiagnostics`] unless another is supplied.

use std::borrow::Cow;
use std::sync::Arc;

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::diagnostic_context;
use crate::forwarder::is_forwarding;
use crate::handler::Appender;
use crate::level::Level;
use crate::log_record::LogEvent;

/// Writes records to standard error as `LEVEL target - message`.
///
/// Only records at or above `level` are written; the default is `Warn`.
#[derive(Clone, Copy, Debug)]
pub struct StderrDiagnostics {
    level: LevelFilter,
}

impl StderrDiagnostics {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Default for StderrDiagnostics {
    fn default() -> Self {
        Self::new(LevelFilter::Warn)
    }
}

impl log::Log for StderrDiagnostics {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "rest_log_appender: {} {} - {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Adapter implementing the Rust `log::Log` trait.
///
/// Records emitted while a forwarder is already handling an event on the same
/// thread are the forwarder's own diagnostics or the HTTP client's. They go to
/// the fallback logger, never back into the appender.
pub struct ForwardingLogger {
    appender: Arc<dyn Appender>,
    max_level: LevelFilter,
    fallback: Box<dyn log::Log>,
}

fn normalise_target(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

impl ForwardingLogger {
    pub fn new(appender: Arc<dyn Appender>, max_level: LevelFilter) -> Self {
        Self {
            appender,
            max_level,
            fallback: Box::new(StderrDiagnostics::default()),
        }
    }

    /// Replace the logger receiving records raised during forwarding.
    pub fn with_fallback(mut self, fallback: Box<dyn log::Log>) -> Self {
        self.fallback = fallback;
        self
    }

    fn to_event(record: &Record<'_>) -> LogEvent {
        LogEvent::new(
            &normalise_target(record.target()),
            Level::from(record.level()),
            record.args().to_string(),
        )
        .with_context_map(diagnostic_context::snapshot())
    }
}

impl log::Log for ForwardingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        if is_forwarding() {
            self.fallback.enabled(metadata)
        } else {
            metadata.level() <= self.max_level
        }
    }

    fn log(&self, record: &Record<'_>) {
        if is_forwarding() {
            self.fallback.log(record);
        } else if record.level() <= self.max_level {
            self.appender.handle(&Self::to_event(record));
        }
    }

    fn flush(&self) {
        self.fallback.flush();
    }
}

/// Install `appender` as the global Rust logger.
///
/// The forwarder's own diagnostics are written by [`StderrDiagnostics`].
///
/// # Errors
///
/// Fails when a different global logger is already set.
pub fn install(appender: Arc<dyn Appender>, max_level: LevelFilter) -> Result<(), SetLoggerError> {
    install_logger(ForwardingLogger::new(appender, max_level), max_level)
}

/// Install `appender` as the global Rust logger, sending the forwarder's own
/// diagnostics to `fallback`.
///
/// # Errors
///
/// Fails when a different global logger is already set.
pub fn install_with_fallback(
    appender: Arc<dyn Appender>,
    max_level: LevelFilter,
    fallback: Box<dyn log::Log>,
) -> Result<(), SetLoggerError> {
    install_logger(
        ForwardingLogger::new(appender, max_level).with_fallback(fallback),
        max_level,
    )
}

fn install_logger(logger: ForwardingLogger, max_level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for the `log` crate bridge.

    use super::*;
    use crate::forwarder::ForwardingGuard;
    use crate::log_record::Payload;
    use crate::test_utils::CollectingAppender;
    use log::Log;
    use parking_lot::Mutex;
    use rstest::{fixture, rstest};

    #[derive(Clone, Default)]
    struct RecordingLog {
        records: Arc<Mutex<Vec<(log::Level, String)>>>,
    }

    impl Log for RecordingLog {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &Record<'_>) {
            if self.enabled(record.metadata()) {
                self.records
                    .lock()
                    .push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    #[fixture]
    fn appender() -> CollectingAppender {
        CollectingAppender::new()
    }

    fn bridge(appender: &CollectingAppender, max_level: LevelFilter) -> ForwardingLogger {
        ForwardingLogger::new(Arc::new(appender.clone()), max_level)
    }

    fn emit(logger: &ForwardingLogger, level: log::Level, target: &str, message: &str) {
        logger.log(
            &Record::builder()
                .args(format_args!("{message}"))
                .level(level)
                .target(target)
                .build(),
        );
    }

    #[rstest]
    fn converts_records_to_text_events(appender: CollectingAppender) {
        let logger = bridge(&appender, LevelFilter::Trace);
        emit(&logger, log::Level::Warn, "app::download", r#"{"type":"X"}"#);

        let events = appender.collected();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].logger, "app.download");
        assert_eq!(events[0].level, Level::Warn);
        assert_eq!(events[0].payload, Payload::Text(r#"{"type":"X"}"#.into()));
    }

    #[rstest]
    fn respects_max_level(appender: CollectingAppender) {
        let logger = bridge(&appender, LevelFilter::Warn);
        emit(&logger, log::Level::Info, "app", "ignored");
        emit(&logger, log::Level::Error, "app", "kept");

        let events = appender.collected();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload, Payload::from("kept"));
    }

    #[rstest]
    fn copies_diagnostic_context(appender: CollectingAppender) {
        let logger = bridge(&appender, LevelFilter::Trace);
        diagnostic_context::clear();
        diagnostic_context::insert("user-agent", "Mozilla/5.0");
        emit(&logger, log::Level::Info, "app", "with context");
        diagnostic_context::clear();
        emit(&logger, log::Level::Info, "app", "without context");

        let events = appender.collected();
        assert_eq!(events[0].context_value("user-agent"), Some("Mozilla/5.0"));
        assert!(events[1].context.is_empty());
    }

    #[rstest]
    fn records_raised_while_forwarding_go_to_fallback(appender: CollectingAppender) {
        let fallback = RecordingLog::default();
        let logger =
            bridge(&appender, LevelFilter::Trace).with_fallback(Box::new(fallback.clone()));
        {
            let _guard = ForwardingGuard::enter();
            let metadata = Metadata::builder().level(log::Level::Debug).build();
            assert!(!logger.enabled(&metadata));
            emit(&logger, log::Level::Error, "rest_log_appender::forwarder", "nested");
            emit(&logger, log::Level::Debug, "ureq::unit", "chatter");
        }
        emit(&logger, log::Level::Error, "app", "outer");

        let events = appender.collected();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload, Payload::from("outer"));
        assert_eq!(
            *fallback.records.lock(),
            vec![(log::Level::Error, "nested".to_string())]
        );
    }

    #[rstest]
    fn stderr_diagnostics_filters_by_level() {
        let sink = StderrDiagnostics::default();
        let warn = Metadata::builder().level(log::Level::Warn).build();
        let info = Metadata::builder().level(log::Level::Info).build();
        assert!(sink.enabled(&warn));
        assert!(!sink.enabled(&info));
    }
}
