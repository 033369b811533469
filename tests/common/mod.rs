#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use snaplink::api::handlers::{health_handler, redirect_handler};
use snaplink::api::routes::api_routes;
use snaplink::domain::entities::{NewLink, ShortLink};
use snaplink::infrastructure::persistence::MemoryStore;
use snaplink::state::AppState;
use snaplink::utils::clock::ManualClock;
use snaplink::utils::code_generator::CodeGenerator;

pub const BASE_URL: &str = "https://s.example.com";

/// State over a fresh in-memory store with a controllable clock.
pub struct TestContext {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

pub fn create_test_state() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::default());

    let state = AppState::new(
        store.clone(),
        clock.clone(),
        CodeGenerator::from_seed(2026),
        BASE_URL,
        1000,
    );

    TestContext {
        state,
        clock,
        store,
    }
}

/// Same routes as the production router, without the outer middleware.
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/r/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .with_state(state)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(test_app(state)).unwrap()
}

pub async fn create_test_link(state: &AppState, code: &str, url: &str) -> ShortLink {
    state
        .link_store
        .insert(NewLink::new(url).with_shortcode(code))
        .await
        .unwrap()
}

pub async fn create_short_lived_link(state: &AppState, code: &str, url: &str) -> ShortLink {
    state
        .link_store
        .insert(NewLink::new(url).with_shortcode(code).with_validity(1))
        .await
        .unwrap()
}
