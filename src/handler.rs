use crate::log_record::LogEvent;

/// Capability implemented by appenders the host logging layer can drive.
///
/// `handle` may be called from many threads at once and must never panic or
/// return an error to the caller; failures are reported through the `log`
/// facade instead.
pub trait Appender: Send + Sync {
    /// Process one event and return an informational status code.
    ///
    /// `0` means the event was skipped.
    fn handle(&self, event: &LogEvent) -> u16;

    /// Release resources held by the appender.
    fn shutdown(&self);
}
