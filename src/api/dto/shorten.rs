//! DTOs for the link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::entities::{NewLink, RequestedValidity, ShortLink};

/// Request to shorten one or more URLs.
///
/// Rows are not checked here. The link store validates them in order so the
/// first failing row is the one reported.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub urls: Vec<UrlItem>,
}

/// One row of a shorten request.
#[derive(Debug, Deserialize)]
pub struct UrlItem {
    pub url: String,

    /// Validity window in minutes. A JSON number, a numeric string, or null.
    #[serde(default)]
    pub validity_minutes: Option<Value>,

    /// Optional custom shortcode. Blank means "generate one".
    pub shortcode: Option<String>,
}

impl UrlItem {
    /// Converts the row into a draft, keeping a malformed validity for the
    /// store to reject.
    pub fn into_draft(self) -> NewLink {
        NewLink {
            long_url: self.url,
            validity: parse_validity(self.validity_minutes.as_ref()),
            shortcode: self.shortcode,
        }
    }
}

fn parse_validity(raw: Option<&Value>) -> RequestedValidity {
    let unparsable = |raw: &Value| RequestedValidity::Unparsable(raw.to_string());

    match raw {
        None | Some(Value::Null) => RequestedValidity::Default,
        Some(raw @ Value::Number(n)) => n
            .as_i64()
            .map_or_else(|| unparsable(raw), RequestedValidity::Minutes),
        Some(Value::String(s)) if s.trim().is_empty() => RequestedValidity::Default,
        Some(raw @ Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_or_else(|_| unparsable(raw), RequestedValidity::Minutes),
        Some(other) => unparsable(other),
    }
}

/// Response listing every link created by the request, in row order.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub count: usize,
    pub items: Vec<ShortenedLink>,
}

#[derive(Debug, Serialize)]
pub struct ShortenedLink {
    pub id: Uuid,
    pub shortcode: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
}

impl ShortenedLink {
    pub fn from_link(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            shortcode: link.shortcode,
            short_url,
            long_url: link.long_url,
            created_at: link.created_at,
            expire_at: link.expire_at,
        }
    }
}
