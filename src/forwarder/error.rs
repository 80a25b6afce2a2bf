use thiserror::Error;

/// Status reported when an event is skipped.
pub const SKIPPED: u16 = 0;
/// Status reported for any failure after the event was accepted.
pub const NOT_ACCEPTABLE: u16 = 406;

/// Failures on the forwarding path.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// No collector URL has been configured.
    #[error("no destination URL configured")]
    NoDestination,
    /// A structured record could not be serialised.
    #[error("failed to serialise structured record: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The collector answered with a non-2xx status.
    #[error("collector responded with status {0}")]
    Status(u16),
}

impl ForwardError {
    /// Status code reported to the caller for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NoDestination => SKIPPED,
            Self::Serialize(_) | Self::Transport(_) | Self::Status(_) => NOT_ACCEPTABLE,
        }
    }
}
