//! DTOs for the event log endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::LogEntry;

/// Query parameters for `GET /api/logs`.
///
/// Uses `serde_with` to parse the limit from the query string.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct LogsQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    /// Entries currently stored, before `limit` is applied.
    pub total: usize,
    pub entries: Vec<LogEntry>,
}
