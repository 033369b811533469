//! Request context captured for a redirect attempt.

use chrono::{DateTime, Utc};

use crate::domain::entities::{ClickEvent, CoarseLocale};

/// What the redirect endpoint knows about the client.
///
/// Built by the HTTP handler from request headers and turned into a
/// [`ClickEvent`] only when the redirect succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickContext {
    pub referrer: Option<String>,
    pub locale: CoarseLocale,
    pub source_path: String,
}

impl ClickContext {
    pub fn new(
        referrer: Option<&str>,
        locale: CoarseLocale,
        source_path: impl Into<String>,
    ) -> Self {
        Self {
            referrer: referrer.map(|s| s.to_string()),
            locale,
            source_path: source_path.into(),
        }
    }

    /// Builds the click event stamped at `ts`.
    pub fn into_click(self, ts: DateTime<Utc>) -> ClickEvent {
        ClickEvent {
            ts,
            referrer: self.referrer.unwrap_or_default(),
            coarse_locale: self.locale,
            source_path: self.source_path,
        }
    }
}
