//! Diagnostic log entry written by the event log.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Domain events recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    ShortCreated,
    ValidationError,
    RedirectClick,
    RedirectFailed,
    PurgeExpired,
    Copied,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::ShortCreated => "short_created",
            EventName::ValidationError => "validation_error",
            EventName::RedirectClick => "redirect_click",
            EventName::RedirectFailed => "redirect_failed",
            EventName::PurgeExpired => "purge_expired",
            EventName::Copied => "copied",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event_name: EventName,
    pub payload: Value,
}

impl LogEntry {
    pub fn new(event_name: EventName, payload: Value, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            event_name,
            payload,
        }
    }
}
