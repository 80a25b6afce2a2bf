//! Typed log payload posted to the collector.
//!
//! Every field is optional. Absent fields are left out of the JSON body and
//! unknown fields are ignored when a text payload is validated against this
//! shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredRecord {
    /// Event type identifier understood by the collector.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(rename = "userIP", skip_serializing_if = "Option::is_none")]
    pub user_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Reporting month, e.g. `202401`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Per-entity counts attached to the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_counts: Option<BTreeMap<String, u64>>,
}

impl StructuredRecord {
    /// Create a record carrying only an event type.
    pub fn with_type(event_type: impl Into<String>) -> Self {
        Self {
            event_type: Some(event_type.into()),
            ..Self::default()
        }
    }
}
