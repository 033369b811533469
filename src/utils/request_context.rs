//! Click context extraction from HTTP request headers.

use axum::http::{HeaderMap, HeaderName, header};

use crate::domain::click_context::ClickContext;
use crate::domain::entities::CoarseLocale;

/// Header carrying the client's IANA timezone name (e.g. `Europe/Berlin`).
pub static TIMEZONE_HEADER: HeaderName = HeaderName::from_static("x-timezone");

const MAX_LOCALE_PART_LEN: usize = 64;

/// Builds the click context for a redirect request.
///
/// - `Referer` becomes the referrer (absent or non-UTF-8 means none)
/// - the first `Accept-Language` tag becomes the language
/// - `X-Timezone` becomes the timezone
///
/// Missing or malformed locale parts are recorded as `unknown`.
pub fn click_context_from_headers(headers: &HeaderMap, source_path: &str) -> ClickContext {
    let referrer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(primary_language);

    let timezone = headers
        .get(&TIMEZONE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(sanitize_locale_part);

    let locale = CoarseLocale::new(
        language.unwrap_or(CoarseLocale::UNKNOWN),
        timezone.unwrap_or(CoarseLocale::UNKNOWN),
    );

    ClickContext::new(referrer, locale, source_path)
}

/// Extracts the first language tag from an `Accept-Language` value,
/// dropping any quality parameter (`en-US,en;q=0.9` -> `en-US`).
fn primary_language(value: &str) -> Option<&str> {
    let first = value.split(',').next()?;
    let tag = first.split(';').next()?;
    sanitize_locale_part(tag).filter(|tag| *tag != "*")
}

fn sanitize_locale_part(value: &str) -> Option<&str> {
    let value = value.trim();
    let well_formed = !value.is_empty()
        && value.len() <= MAX_LOCALE_PART_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '+' | '*'));

    well_formed.then_some(value)
}
