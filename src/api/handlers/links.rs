//! Handlers for link inspection and maintenance.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::links::{
    CopiedRequest, CopiedResponse, LinkDetailResponse, LinkItem, LinkListResponse, PurgeResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every stored link, most recently created first.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// Expired links are included (with `expired: true`) until purged.
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_store.all().await?;
    let now = state.link_store.now();

    let items: Vec<LinkItem> = links
        .iter()
        .map(|link| LinkItem::new(link, state.short_url(&link.shortcode), link.is_expired_at(now)))
        .collect();

    let expired = items.iter().filter(|item| item.expired).count();

    Ok(Json(LinkListResponse {
        total: items.len(),
        expired,
        items,
    }))
}

/// Returns one link with its click history.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or was purged.
pub async fn link_detail_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkDetailResponse>, AppError> {
    let stats = state.link_store.stats(&code).await?;
    let short_url = state.short_url(&stats.link.shortcode);

    Ok(Json(LinkDetailResponse {
        link: LinkItem::new(&stats.link, short_url, stats.expired),
        clicks: stats.link.clicks,
    }))
}

/// Removes every expired link.
///
/// # Endpoint
///
/// `POST /api/links/purge`
pub async fn purge_handler(State(state): State<AppState>) -> Result<Json<PurgeResponse>, AppError> {
    let report = state.link_store.purge_expired().await?;

    Ok(Json(PurgeResponse {
        removed_count: report.removed_count,
    }))
}

/// Records whether copying the short URL to the clipboard worked.
///
/// # Endpoint
///
/// `POST /api/links/{code}/copied` with `{ "success": true }`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown.
pub async fn copied_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<CopiedRequest>,
) -> Result<Json<CopiedResponse>, AppError> {
    let short_url = state.short_url(&code);

    state
        .link_store
        .record_copy(&code, &short_url, payload.success)
        .await?;

    Ok(Json(CopiedResponse {
        shortcode: code,
        short_url,
        success: payload.success,
    }))
}
