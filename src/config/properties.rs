//! Reader for the logger client properties file.
//!
//! The file uses Java properties syntax (`key=value` lines, `#` comments),
//! which `rust-ini` accepts as an INI document without sections once
//! whitespace-separated entries (`key value`) are rewritten as `key=value`.

use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use ini::Ini;

use super::ConfigError;

/// Fixed location of the client properties file.
pub const LOGGER_CLIENT_PROPERTIES: &str = "/data/logger-client/config/logger-client.properties";
/// Property naming the collector URL.
pub const LOGGER_URL_PROPERTY: &str = "logger_url";

/// Read the collector URL from the properties file at `path`.
///
/// Returns `Ok(None)` when the property is absent or blank.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the file is missing,
/// [`ConfigError::Io`] when it cannot be read, and [`ConfigError::Parse`] when
/// its contents are malformed.
pub fn load_client_properties(path: &Path) -> Result<Option<String>, ConfigError> {
    let text = normalise_separators(&read_text(path)?);
    let props = Ini::load_from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(props
        .general_section()
        .get(LOGGER_URL_PROPERTY)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(ToOwned::to_owned))
}

/// Read a configuration file into a string.
///
/// Properties files are ISO-8859-1 by convention, so bytes that are not valid
/// UTF-8 are decoded as Latin-1. WHATWG maps that label to windows-1252.
pub(crate) fn read_text(path: &Path) -> Result<String, ConfigError> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    })?;
    Ok(decode(&bytes).into_owned())
}

fn normalise_separators(text: &str) -> String {
    text.lines()
        .map(normalise_separator)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite `key value` as `key=value`. The key ends at the first `=`, `:` or
/// whitespace.
fn normalise_separator(line: &str) -> Cow<'_, str> {
    let body = line.trim_start();
    if body.is_empty() || body.starts_with(['#', '!', '[']) {
        return Cow::Borrowed(line);
    }
    let Some(key_end) = body.find(|c: char| c == '=' || c == ':' || c.is_whitespace()) else {
        return Cow::Borrowed(line);
    };
    let value = body[key_end..].trim_start();
    if value.is_empty() || value.starts_with(['=', ':']) {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(format!("{}={value}", &body[..key_end]))
    }
}

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp properties file");
        file.write_all(bytes).expect("write properties contents");
        file
    }

    #[rstest]
    fn reads_url_among_comments_and_other_keys() {
        let file = write_file(
            b"# logger client\nlogger_timeout=100\nlogger_url = http://collector.example/log \n",
        );
        let url = load_client_properties(file.path()).expect("load properties");
        assert_eq!(url.as_deref(), Some("http://collector.example/log"));
    }

    #[rstest]
    fn empty_file_has_no_url() {
        let file = write_file(b"");
        assert_eq!(load_client_properties(file.path()).expect("load"), None);
    }

    #[rstest]
    fn missing_file_is_reported() {
        let err = load_client_properties(Path::new("/nonexistent/client.properties"))
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[rstest]
    fn malformed_file_is_reported() {
        let file = write_file(b"[unterminated\nlogger_url=http://x\n");
        let err = load_client_properties(file.path()).expect_err("malformed file must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[rstest]
    #[case("logger_url http://collector.example/log\n")]
    #[case("  logger_url\t  http://collector.example/log\n")]
    #[case("logger_url : http://collector.example/log\n")]
    #[case("logger_url = http://collector.example/log\n")]
    fn accepts_java_separators(#[case] contents: &str) {
        let file = write_file(contents.as_bytes());
        let url = load_client_properties(file.path()).expect("load properties");
        assert_eq!(url.as_deref(), Some("http://collector.example/log"));
    }

    #[rstest]
    #[case("logger_url http://h/log", "logger_url=http://h/log")]
    #[case("owner Jo Bloggs", "owner=Jo Bloggs")]
    #[case("logger_url=http://h/log", "logger_url=http://h/log")]
    #[case("# logger_url http://h/log", "# logger_url http://h/log")]
    #[case("bare_key", "bare_key")]
    fn rewrites_whitespace_separator_only(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(normalise_separator(line), expected);
    }

    #[rstest]
    fn latin1_bytes_are_decoded() {
        assert_eq!(decode(b"caf\xE9"), "caf\u{e9}");
        let file = write_file(b"owner=Jos\xE9\nlogger_url=http://collector.example/log\n");
        let url = load_client_properties(file.path()).expect("load latin1 properties");
        assert_eq!(url.as_deref(), Some("http://collector.example/log"));
    }
}
