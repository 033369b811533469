//! Handlers for the event log.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::logs::{LogsQuery, LogsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the most recent log entries.
///
/// # Endpoint
///
/// `GET /api/logs?limit=50`
///
/// # Query Parameters
///
/// - `limit` (optional): 1-1000, defaults to every stored entry
pub async fn logs_handler(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, AppError> {
    query.validate()?;

    let mut entries = state.event_log.read().await?;
    let total = entries.len();

    if let Some(limit) = query.limit {
        entries.truncate(limit);
    }

    Ok(Json(LogsResponse { total, entries }))
}

/// Deletes every log entry.
///
/// # Endpoint
///
/// `DELETE /api/logs`
pub async fn clear_logs_handler(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.event_log.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
