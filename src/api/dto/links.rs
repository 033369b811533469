//! DTOs for link inspection and maintenance endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{ClickEvent, ShortLink};

/// Summary row for a stored link.
#[derive(Debug, Serialize)]
pub struct LinkItem {
    pub id: Uuid,
    pub shortcode: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
    pub expired: bool,
    pub click_count: usize,
}

impl LinkItem {
    pub fn new(link: &ShortLink, short_url: String, expired: bool) -> Self {
        Self {
            id: link.id,
            shortcode: link.shortcode.clone(),
            short_url,
            long_url: link.long_url.clone(),
            created_at: link.created_at,
            expire_at: link.expire_at,
            expired,
            click_count: link.click_count(),
        }
    }
}

/// `GET /api/links` response.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub expired: usize,
    pub items: Vec<LinkItem>,
}

/// `GET /api/links/{code}` response: the summary plus the click history.
#[derive(Debug, Serialize)]
pub struct LinkDetailResponse {
    #[serde(flatten)]
    pub link: LinkItem,
    pub clicks: Vec<ClickEvent>,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub removed_count: usize,
}

/// Outcome of a clipboard copy reported by the client.
#[derive(Debug, Deserialize)]
pub struct CopiedRequest {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct CopiedResponse {
    pub shortcode: String,
    pub short_url: String,
    pub success: bool,
}
