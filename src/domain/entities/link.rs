//! Short link entity and the draft used to create one.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::click::ClickEvent;

/// Validity window applied when a draft does not specify one.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

/// A shortened URL together with its click history.
///
/// Everything except `clicks` is fixed at creation. `clicks` is kept newest first
/// and only ever grows until the link is purged. Expiration is derived from
/// `expire_at` and never stored as a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub id: Uuid,
    pub shortcode: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
    #[serde(default)]
    pub clicks: Vec<ClickEvent>,
}

impl ShortLink {
    /// Creates a link with a fresh id and an empty click history.
    pub fn new(
        shortcode: String,
        long_url: String,
        created_at: DateTime<Utc>,
        expire_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            shortcode,
            long_url,
            created_at,
            expire_at,
            clicks: Vec::new(),
        }
    }

    /// Returns true once `expire_at` lies strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at < now
    }

    /// Returns the link with `event` placed at the front of its history.
    pub fn with_click(mut self, event: ClickEvent) -> Self {
        self.push_click(event);
        self
    }

    pub fn push_click(&mut self, event: ClickEvent) {
        self.clicks.insert(0, event);
    }

    pub fn click_count(&self) -> usize {
        self.clicks.len()
    }

    /// Length of the validity window in whole minutes.
    pub fn validity_minutes(&self) -> i64 {
        (self.expire_at - self.created_at).num_minutes()
    }
}

/// Validity window as submitted by the client.
///
/// Parsing is deferred so a malformed value is reported only after the row's
/// URL has been checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestedValidity {
    /// Nothing given; [`DEFAULT_VALIDITY_MINUTES`] applies.
    #[default]
    Default,
    Minutes(i64),
    /// Raw input that is not a whole number of minutes.
    Unparsable(String),
}

impl fmt::Display for RequestedValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedValidity::Default => Ok(()),
            RequestedValidity::Minutes(minutes) => write!(f, "{minutes}"),
            RequestedValidity::Unparsable(raw) => f.write_str(raw),
        }
    }
}

/// Input for creating a new link.
///
/// An absent validity falls back to [`DEFAULT_VALIDITY_MINUTES`]; an absent or
/// blank `shortcode` asks the store to generate one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLink {
    pub long_url: String,
    pub validity: RequestedValidity,
    pub shortcode: Option<String>,
}

impl NewLink {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            ..Self::default()
        }
    }

    pub fn with_validity(mut self, minutes: i64) -> Self {
        self.validity = RequestedValidity::Minutes(minutes);
        self
    }

    pub fn with_shortcode(mut self, code: impl Into<String>) -> Self {
        self.shortcode = Some(code.into());
        self
    }

    /// The requested shortcode, or `None` when it is absent or all whitespace.
    ///
    /// A non-blank code is returned as given, so surrounding spaces fail the
    /// format check.
    pub fn requested_shortcode(&self) -> Option<&str> {
        self.shortcode
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }

    /// Computes the validity window, or `None` when the request is not a
    /// positive number of minutes representable as a duration.
    pub fn validity(&self) -> Option<TimeDelta> {
        let minutes = match self.validity {
            RequestedValidity::Default => DEFAULT_VALIDITY_MINUTES,
            RequestedValidity::Minutes(minutes) => minutes,
            RequestedValidity::Unparsable(_) => return None,
        };
        if minutes <= 0 {
            return None;
        }
        TimeDelta::try_minutes(minutes)
    }
}
