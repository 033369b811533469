//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{ClickRecorder, EventLog, LinkStore, RedirectResolver};
use crate::domain::repositories::KeyValueStore;
use crate::utils::clock::Clock;
use crate::utils::code_generator::CodeGenerator;

/// Service handles shared by every request.
///
/// All services sit on the same [`KeyValueStore`], so the link collection and the
/// event log live side by side under their fixed keys.
#[derive(Clone)]
pub struct AppState {
    pub link_store: Arc<LinkStore>,
    pub resolver: Arc<RedirectResolver>,
    pub event_log: Arc<EventLog>,
    pub store: Arc<dyn KeyValueStore>,
    /// Prefix of the short URLs returned to clients.
    pub base_url: String,
}

impl AppState {
    /// Wires the services together over `store`.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        generator: CodeGenerator,
        base_url: impl Into<String>,
        event_log_capacity: usize,
    ) -> Self {
        let event_log = Arc::new(
            EventLog::new(store.clone(), clock.clone()).with_capacity(event_log_capacity),
        );
        let link_store = Arc::new(LinkStore::new(
            store.clone(),
            Arc::new(generator),
            clock,
            event_log.clone(),
        ));
        let recorder = Arc::new(ClickRecorder::new(link_store.clone()));
        let resolver = Arc::new(RedirectResolver::new(
            link_store.clone(),
            recorder,
            event_log.clone(),
        ));

        Self {
            link_store,
            resolver,
            event_log,
            store,
            base_url: base_url.into(),
        }
    }

    /// Full short URL for `code` under the configured base.
    pub fn short_url(&self, code: &str) -> String {
        self.link_store.short_url(&self.base_url, code)
    }
}
