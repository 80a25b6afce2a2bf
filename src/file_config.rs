//! INI parsing for host-side forwarder configuration.
//!
//! Hosts that configure logging from an INI file describe the forwarder in a
//! dedicated section. This module reuses the `rust-ini` crate to read that
//! section into ordered key/value pairs.

use std::path::Path;

use ini::Ini;

use crate::config::{ConfigError, read_text};

pub(crate) type SectionEntries = Vec<(String, String)>;

/// Read `section` from the INI file at `path`.
///
/// # Errors
///
/// Fails when the file is missing, unreadable, empty, malformed, or lacks the
/// requested section.
pub(crate) fn read_section(path: &Path, section: &str) -> Result<SectionEntries, ConfigError> {
    let text = read_text(path)?;
    if text.trim().is_empty() {
        return Err(ConfigError::Parse {
            path: path.to_path_buf(),
            message: "empty file".into(),
        });
    }
    parse_section(path, &text, section)
}

fn parse_section(path: &Path, text: &str, section: &str) -> Result<SectionEntries, ConfigError> {
    let ini = Ini::load_from_str(text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let props = ini
        .section(Some(section))
        .ok_or_else(|| ConfigError::MissingSection {
            path: path.to_path_buf(),
            section: section.to_owned(),
        })?;
    Ok(props
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_owned()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONTENTS: &str = r#"[loggers]
keys = root

[appender_rest]
urlTemplate = http://collector.example/log
timeout = 2500
"#;

    #[rstest]
    fn parses_requested_section_in_order() {
        let entries =
            parse_section(Path::new("log.ini"), CONTENTS, "appender_rest").expect("parse");
        assert_eq!(
            entries,
            vec![
                ("urlTemplate".to_string(), "http://collector.example/log".to_string()),
                ("timeout".to_string(), "2500".to_string()),
            ]
        );
    }

    #[rstest]
    fn missing_section_is_reported() {
        let err = parse_section(Path::new("log.ini"), CONTENTS, "appender_other")
            .expect_err("missing section must fail");
        assert!(matches!(err, ConfigError::MissingSection { .. }));
    }

    #[rstest]
    fn read_section_rejects_empty_file() {
        let file = NamedTempFile::new().expect("create temp ini file");
        let err = read_section(file.path(), "appender_rest").expect_err("empty files must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[rstest]
    fn read_section_reads_from_disk() {
        let mut file = NamedTempFile::new().expect("create temp ini file");
        file.write_all(CONTENTS.as_bytes())
            .expect("write ini contents");
        let entries = read_section(file.path(), "appender_rest").expect("should parse");
        assert_eq!(entries.len(), 2);
    }
}
