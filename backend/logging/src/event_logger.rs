//! Conversion Event Logger
//!
//! One structured entry per conversion milestone, emitted under the
//! `conversion_events` target so it can be filtered or routed separately.
//! Markdown content is never logged, only its size.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const EVENT_TARGET: &str = "conversion_events";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversionEvent {
    Received {
        markdown_bytes: usize,
    },
    Completed {
        pdf_bytes: usize,
        elapsed_ms: u64,
    },
    Rejected {
        reason: String,
    },
    Failed {
        stage: String,
        error_msg: String,
        elapsed_ms: u64,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: ConversionEvent,
}

impl EventLogEntry {
    pub fn new(request_id: Uuid, event: ConversionEvent) -> Self {
        Self { request_id, timestamp: Utc::now(), event }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Records `event` for `request_id`, at a level matching its severity.
    pub fn log_event(request_id: Uuid, event: ConversionEvent) {
        let entry = EventLogEntry::new(request_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        match &entry.event {
            ConversionEvent::Failed { .. } => {
                error!(target: EVENT_TARGET, %request_id, entry = %json, "Conversion event")
            }
            ConversionEvent::Rejected { .. } => {
                warn!(target: EVENT_TARGET, %request_id, entry = %json, "Conversion event")
            }
            _ => info!(target: EVENT_TARGET, %request_id, entry = %json, "Conversion event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let entry = EventLogEntry::new(
            Uuid::nil(),
            ConversionEvent::Failed {
                stage: "render".into(),
                error_msg: "chrome exited".into(),
                elapsed_ms: 12,
            },
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["event"]["type"], "failed");
        assert_eq!(value["event"]["stage"], "render");
        assert_eq!(value["request_id"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn received_event_carries_size_only() {
        let value = serde_json::to_value(ConversionEvent::Received { markdown_bytes: 42 }).unwrap();
        assert_eq!(value, serde_json::json!({"type": "received", "markdown_bytes": 42}));
    }
}
