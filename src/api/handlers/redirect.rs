//! Handler for short URL redirect.

use axum::{
    extract::{OriginalUri, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_context::click_context_from_headers;

/// Redirects a shortcode to its original URL.
///
/// # Endpoint
///
/// `GET /{code}` and `GET /r/{code}`
///
/// # Request Flow
///
/// 1. Build the click context from `Referer`, `Accept-Language`, `X-Timezone`
///    and the request path
/// 2. Resolve the code; a live link gets the click appended before responding
/// 3. Return 307 Temporary Redirect
///
/// Any delay before navigating is up to the client; the click is already
/// recorded when the response leaves.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown.
/// Returns 410 Gone if the link has expired but was not purged yet.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let context = click_context_from_headers(&headers, uri.path());

    let (target, _link) = state.resolver.resolve(&code, context).await?.into_result()?;

    Ok(Redirect::temporary(&target))
}
