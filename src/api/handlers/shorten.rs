//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse, ShortenedLink, UrlItem};
use crate::error::AppError;
use crate::state::AppState;

/// Creates short links for up to five URLs, all or nothing.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "urls": [
///     { "url": "https://example.com" },
///     { "url": "https://example.org", "validity_minutes": 60, "shortcode": "promo" }
///   ]
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the links in request order:
///
/// ```json
/// {
///   "count": 2,
///   "items": [
///     {
///       "id": "…",
///       "shortcode": "aZ3k9Qp",
///       "short_url": "https://s.example.com/aZ3k9Qp",
///       "long_url": "https://example.com",
///       "created_at": "2026-01-01T12:00:00Z",
///       "expire_at": "2026-01-01T12:30:00Z"
///     }
///   ]
/// }
/// ```
///
/// # Errors
///
/// The first failing row rejects the whole request and nothing is stored:
///
/// - 400 `invalid_url`, `invalid_validity`, `invalid_shortcode`, `invalid_batch`
/// - 409 `shortcode_collision`
/// - 500 `exhausted_code_space`, `persistence_error`
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let drafts = payload.urls.into_iter().map(UrlItem::into_draft).collect();
    let created = state.link_store.insert_batch(drafts).await?;

    let items: Vec<ShortenedLink> = created
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.shortcode);
            ShortenedLink::from_link(link, short_url)
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            count: items.len(),
            items,
        }),
    ))
}
