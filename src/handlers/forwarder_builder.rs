//! Builder for [`LogForwarder`](crate::forwarder::LogForwarder).
//!
//! Mirrors the settings a host logging configuration exposes for the
//! appender: a fallback URL template, credentials, a request timeout and a
//! severity threshold. The client properties file is consulted before the
//! fallback URL is applied, so a URL found there always wins.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;

use crate::config::{ForwarderConfig, LOGGER_CLIENT_PROPERTIES};
use crate::file_config::read_section;
use crate::forwarder::LogForwarder;
use crate::level::Level;

use super::{AppenderBuilderTrait, BuildError};

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(BuildError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing [`LogForwarder`] instances.
#[derive(Clone, Debug)]
pub struct ForwarderBuilder {
    name: Option<String>,
    properties_path: Option<PathBuf>,
    url_template: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout_ms: Option<u64>,
    connect_timeout_ms: Option<u64>,
    drop_report_interval_ms: Option<u64>,
    threshold: Option<Level>,
}

impl Default for ForwarderBuilder {
    fn default() -> Self {
        Self {
            name: None,
            properties_path: Some(PathBuf::from(LOGGER_CLIENT_PROPERTIES)),
            url_template: None,
            username: None,
            password: None,
            timeout_ms: None,
            connect_timeout_ms: None,
            drop_report_interval_ms: None,
            threshold: None,
        }
    }
}

impl ForwarderBuilder {
    /// Create a builder reading the standard client properties file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the client properties from `path` instead of the fixed location.
    pub fn with_properties_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.properties_path = Some(path.into());
        self
    }

    /// Skip the client properties file entirely.
    pub fn without_properties_file(mut self) -> Self {
        self.properties_path = None;
        self
    }

    /// Fallback collector URL, used only when the properties file has none.
    pub fn with_url_template(mut self, url: impl Into<String>) -> Self {
        self.url_template = Some(url.into());
        self
    }

    /// Name reported in diagnostics.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Username accepted for configuration compatibility.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Password accepted for configuration compatibility.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    option_setter!(
        #[doc = "Set the request timeout in milliseconds."]
        with_timeout_ms,
        timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the connect timeout in milliseconds."]
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Coalesce \"no destination\" errors into one report per interval."]
        with_drop_report_interval_ms,
        drop_report_interval_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the minimum severity forwarded."]
        with_threshold,
        threshold,
        Level
    );

    /// Populate a builder from a section of an INI logging configuration.
    ///
    /// Recognised keys are `urlTemplate`, `username`, `password`, `timeout`,
    /// `connectTimeout`, `dropReportInterval`, `threshold`, `name` and
    /// `propertiesFile`. Other keys are ignored.
    ///
    /// # Errors
    ///
    /// Fails when the file or section cannot be read, or when a numeric or
    /// level value does not parse.
    pub fn from_ini_section(path: &Path, section: &str) -> Result<Self, BuildError> {
        read_section(path, section)?
            .into_iter()
            .try_fold(Self::new(), |builder, (key, value)| builder.apply_entry(&key, &value))
    }

    fn apply_entry(self, key: &str, value: &str) -> Result<Self, BuildError> {
        let value = value.trim();
        Ok(match key {
            "urlTemplate" => self.with_url_template(value),
            "username" => self.with_username(value),
            "password" => self.with_password(value),
            "timeout" => self.with_timeout_ms(parse_millis(key, value)?),
            "connectTimeout" => self.with_connect_timeout_ms(parse_millis(key, value)?),
            "dropReportInterval" => {
                self.with_drop_report_interval_ms(parse_millis(key, value)?)
            }
            "threshold" => self.with_threshold(
                value
                    .parse()
                    .map_err(|err| BuildError::InvalidConfig(format!("threshold: {err}")))?,
            ),
            "name" => self.with_name(value),
            "propertiesFile" => self.with_properties_path(value),
            _ => {
                debug!("Ignoring unknown appender setting '{key}'");
                self
            }
        })
    }

    fn validate(&self) -> Result<(), BuildError> {
        if let Some(timeout) = self.timeout_ms {
            ensure_positive!(timeout, "timeout")?;
        }
        if let Some(timeout) = self.connect_timeout_ms {
            ensure_positive!(timeout, "connect_timeout")?;
        }
        if let Some(interval) = self.drop_report_interval_ms {
            ensure_positive!(interval, "drop_report_interval")?;
        }
        Ok(())
    }

    /// Resolve the runtime configuration.
    ///
    /// A missing URL is not an error: the resulting forwarder drops events
    /// and reports it.
    pub fn build_config(&self) -> Result<ForwarderConfig, BuildError> {
        self.validate()?;

        let defaults = ForwarderConfig::default();
        let mut config = ForwarderConfig {
            name: self.name.clone().unwrap_or(defaults.name),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: self
                .timeout_ms
                .map_or(defaults.timeout, Duration::from_millis),
            connect_timeout: self
                .connect_timeout_ms
                .map_or(defaults.connect_timeout, Duration::from_millis),
            threshold: self.threshold.unwrap_or(defaults.threshold),
            warn_interval: self.drop_report_interval_ms.map(Duration::from_millis),
            ..ForwarderConfig::default()
        };

        if let Some(path) = &self.properties_path {
            config.configure(path);
        }
        if let Some(url) = &self.url_template {
            config.set_url_template(url.clone());
        }
        Ok(config)
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64, BuildError> {
    value
        .parse()
        .map_err(|err| BuildError::InvalidConfig(format!("{key} must be milliseconds: {err}")))
}

impl AppenderBuilderTrait for ForwarderBuilder {
    type Appender = LogForwarder;

    fn build_inner(&self) -> Result<Self::Appender, BuildError> {
        Ok(LogForwarder::new(self.build_config()?))
    }
}
