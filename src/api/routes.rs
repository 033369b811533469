//! API route configuration.

use crate::api::handlers::{
    clear_logs_handler, copied_handler, link_detail_handler, list_links_handler, logs_handler,
    purge_handler, shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /shorten`              - Create up to five short links
/// - `GET    /links`                - List stored links
/// - `POST   /links/purge`          - Remove expired links
/// - `GET    /links/{code}`         - One link with its clicks
/// - `POST   /links/{code}/copied`  - Record a clipboard copy
/// - `GET    /logs`                 - Read the event log
/// - `DELETE /logs`                 - Clear the event log
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/links", get(list_links_handler))
        .route("/links/purge", post(purge_handler))
        .route("/links/{code}", get(link_detail_handler))
        .route("/links/{code}/copied", post(copied_handler))
        .route("/logs", get(logs_handler).delete(clear_logs_handler))
}
