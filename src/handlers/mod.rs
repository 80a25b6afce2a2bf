//! Builders for appenders.
//!
//! A builder captures the settings a host logging configuration supplies and
//! turns them into a ready [`Appender`](crate::handler::Appender).

use std::sync::Arc;

use thiserror::Error;

use crate::config::ConfigError;
use crate::handler::Appender;

pub mod forwarder_builder;

pub use forwarder_builder::ForwarderBuilder;

/// Errors that may occur while building an appender.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid user supplied configuration.
    #[error("invalid appender configuration: {0}")]
    InvalidConfig(String),
    /// The host configuration file could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Trait implemented by all appender builders.
///
/// `build` returns a shared trait object so the caller can register the
/// appender without knowing its concrete type.
pub trait AppenderBuilderTrait: Send + Sync {
    type Appender: Appender + 'static;

    /// Build the concrete appender.
    fn build_inner(&self) -> Result<Self::Appender, BuildError>;

    /// Build the appender behind an [`Arc`].
    fn build(&self) -> Result<Arc<dyn Appender>, BuildError> {
        Ok(Arc::new(self.build_inner()?))
    }
}
