//! HTTP transport built on a shared ureq agent.

use ureq::{Agent, AgentBuilder};

use crate::config::ForwarderConfig;
use crate::log_record::LogEvent;

use super::error::ForwardError;

/// Diagnostic context key and request header carrying the user agent.
pub const USER_AGENT_PARAM: &str = "user-agent";
/// Header value used when the event carries no user agent.
pub const UNDEFINED_USER_AGENT: &str = "undefined";

/// Result of a successful POST.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpOutcome {
    /// HTTP status returned by the collector.
    pub status: u16,
    /// Response body, when the collector sent one.
    pub body: Option<String>,
}

pub(super) fn build_agent(config: &ForwarderConfig) -> Agent {
    AgentBuilder::new()
        .timeout_connect(config.connect_timeout)
        .timeout(config.timeout)
        .build()
}

/// User agent taken from the event's diagnostic context.
pub(super) fn user_agent(event: &LogEvent) -> &str {
    event
        .context_value(USER_AGENT_PARAM)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(UNDEFINED_USER_AGENT)
}

/// POST `body` to `url` and classify the response.
///
/// # Errors
///
/// Returns [`ForwardError::Status`] for any non-2xx response and
/// [`ForwardError::Transport`] when no response was received.
pub(super) fn post_json(
    agent: &Agent,
    url: &str,
    body: &str,
    user_agent: &str,
) -> Result<HttpOutcome, ForwardError> {
    let response = agent
        .post(url)
        .set("Content-Type", "application/json")
        .set(USER_AGENT_PARAM, user_agent)
        .send_string(body);

    match response {
        Ok(response) => {
            let status = response.status();
            if !(200..300).contains(&status) {
                return Err(ForwardError::Status(status));
            }
            let body = response
                .into_string()
                .ok()
                .filter(|text| !text.is_empty());
            Ok(HttpOutcome { status, body })
        }
        Err(ureq::Error::Status(code, _)) => Err(ForwardError::Status(code)),
        Err(ureq::Error::Transport(err)) => Err(ForwardError::Transport(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use rstest::rstest;

    #[rstest]
    #[case(None, UNDEFINED_USER_AGENT)]
    #[case(Some(""), UNDEFINED_USER_AGENT)]
    #[case(Some("   "), UNDEFINED_USER_AGENT)]
    #[case(Some("Mozilla/5.0"), "Mozilla/5.0")]
    fn user_agent_defaults_when_blank(#[case] value: Option<&str>, #[case] expected: &str) {
        let mut event = LogEvent::new("app", Level::Info, "msg");
        if let Some(value) = value {
            event = event.with_context(USER_AGENT_PARAM, value);
        }
        assert_eq!(user_agent(&event), expected);
    }
}
