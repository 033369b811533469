//! Click event recorded on every successful redirect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Non-identifying client locale hint captured instead of any geolocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoarseLocale {
    pub language: String,
    pub timezone: String,
}

impl CoarseLocale {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(language: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            timezone: timezone.into(),
        }
    }
}

impl Default for CoarseLocale {
    fn default() -> Self {
        Self::new(Self::UNKNOWN, Self::UNKNOWN)
    }
}

/// A single redirect of a short link.
///
/// `referrer` is empty when the client sent none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub ts: DateTime<Utc>,
    #[serde(default)]
    pub referrer: String,
    pub coarse_locale: CoarseLocale,
    pub source_path: String,
}
