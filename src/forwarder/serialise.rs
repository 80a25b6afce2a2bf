//! Conversion of event payloads into request bodies.

use std::borrow::Cow;

use log::warn;

use crate::log_record::Payload;
use crate::structured_record::StructuredRecord;

/// Prefix of the notice an upstream buffering layer emits when it drops
/// events, e.g. `Discarded 12 messages due to full event buffer`.
pub const DISCARD_SENTINEL_PREFIX: &str = "Discarded";

/// Produce the JSON body for `payload`.
///
/// Returns `Ok(None)` when the payload is a discard notice and nothing should
/// be sent.
///
/// # Errors
///
/// Returns an error when a structured record cannot be serialised. Text that
/// fails validation is not an error; it is sent unchanged.
pub(super) fn prepare_body(payload: &Payload) -> Result<Option<Cow<'_, str>>, serde_json::Error> {
    match payload {
        Payload::Record(record) => serde_json::to_string(record).map(|json| Some(Cow::Owned(json))),
        Payload::Text(text) if text.starts_with(DISCARD_SENTINEL_PREFIX) => Ok(None),
        Payload::Text(text) => {
            if let Err(err) = validate_text(text) {
                warn!("Log message is not a valid structured record, sending as-is: {err}");
            }
            Ok(Some(Cow::Borrowed(text)))
        }
    }
}

/// Check that `text` parses as a [`StructuredRecord`]. Unknown fields are
/// accepted.
pub(super) fn validate_text(text: &str) -> Result<StructuredRecord, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn structured_record_omits_none_fields() {
        let payload = Payload::Record(StructuredRecord::with_type("X"));
        let body = prepare_body(&payload).expect("serialise").expect("body");
        assert_eq!(body, r#"{"type":"X"}"#);
    }

    #[rstest]
    #[case("Discarded 3 messages due to full event buffer")]
    #[case("Discarded")]
    fn discard_notice_produces_no_body(#[case] text: &str) {
        let payload = Payload::from(text);
        assert!(prepare_body(&payload).expect("prepare").is_none());
    }

    #[rstest]
    #[case(r#"{"type":"X","unknown":true}"#)]
    #[case("not json at all")]
    #[case(r#"["an","array"]"#)]
    fn text_is_forwarded_verbatim(#[case] text: &str) {
        let payload = Payload::from(text);
        let body = prepare_body(&payload).expect("prepare").expect("body");
        assert_eq!(body, text);
        assert!(matches!(body, Cow::Borrowed(_)));
    }

    #[rstest]
    #[case(r#"{"type":"X","unknown":true}"#, true)]
    #[case(r#"{"recordCounts":{"dr1":"many"}}"#, false)]
    #[case("plain text", false)]
    fn validation_tolerates_unknown_fields_only(#[case] text: &str, #[case] valid: bool) {
        assert_eq!(validate_text(text).is_ok(), valid);
    }

    #[rstest]
    fn sentinel_must_be_a_prefix() {
        let payload = Payload::from("Nothing was Discarded");
        assert!(prepare_body(&payload).expect("prepare").is_some());
    }
}
