//! Runtime configuration for [`LogForwarder`](crate::forwarder::LogForwarder).
//!
//! The destination URL has two sources. The client properties file on disk is
//! consulted first by [`ForwarderConfig::configure`]; the host's own logging
//! configuration may then offer a fallback through
//! [`ForwarderConfig::set_url_template`], which only applies when the
//! properties file did not provide a value.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;

use crate::level::Level;

mod properties;

pub use properties::{LOGGER_CLIENT_PROPERTIES, LOGGER_URL_PROPERTY, load_client_properties};
pub(crate) use properties::read_text;

/// Default name reported in diagnostics.
pub const DEFAULT_NAME: &str = "RestfulAppender";
/// Default timeout applied to each HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default timeout applied when establishing HTTP connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while reading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("{} doesn't exist", .0.display())]
    NotFound(PathBuf),
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file contents could not be parsed.
    #[error("{} is invalid: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    /// A requested INI section is absent.
    #[error("{} has no [{section}] section", path.display())]
    MissingSection { path: PathBuf, section: String },
}

/// Settings owned by a single forwarder instance.
#[derive(Clone)]
pub struct ForwarderConfig {
    /// Name used to identify the forwarder in diagnostics.
    pub name: String,
    pub(crate) url_template: Option<String>,
    /// Accepted for configuration compatibility; never sent.
    pub username: Option<String>,
    /// Accepted for configuration compatibility; never sent.
    pub password: Option<String>,
    /// Overall timeout for a single POST.
    pub timeout: Duration,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
    /// Minimum severity forwarded to the collector.
    pub threshold: Level,
    /// When set, "no destination" errors are coalesced into one report per
    /// interval. Otherwise every dropped event is reported.
    pub warn_interval: Option<Duration>,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            url_template: None,
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            threshold: Level::default(),
            warn_interval: None,
        }
    }
}

impl ForwarderConfig {
    /// Load the destination URL from the client properties file at `path`.
    ///
    /// Any failure is reported as a warning and leaves the URL untouched so a
    /// value from the host configuration can be used instead.
    pub fn configure(&mut self, path: &Path) {
        match load_client_properties(path) {
            Ok(Some(url)) => {
                debug!("Log events will be written to [{url}]");
                self.url_template = Some(url);
            }
            Ok(None) => {}
            Err(ConfigError::NotFound(_)) => {
                warn!(
                    "Cannot find logger client properties file {}. Logger service URL will be \
                     taken from the host logging configuration.",
                    path.display()
                );
            }
            Err(err) => {
                warn!(
                    "Failed to load logger client properties file: {err}. Logger service URL \
                     will be taken from the host logging configuration."
                );
            }
        }
    }

    /// Set the destination URL unless one is already configured.
    pub fn set_url_template(&mut self, url: impl Into<String>) {
        if self.url_template().is_none() {
            self.url_template = Some(url.into());
        }
    }

    /// The destination URL, if a non-blank one has been configured.
    pub fn url_template(&self) -> Option<&str> {
        self.url_template
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}

impl fmt::Debug for ForwarderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwarderConfig")
            .field("name", &self.name)
            .field("url_template", &self.url_template)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("threshold", &self.threshold)
            .field("warn_interval", &self.warn_interval)
            .finish()
    }
}
