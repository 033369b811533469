//! In-process key-value store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::repositories::{KeyValueStore, StoreResult};

/// A [`KeyValueStore`] that keeps blobs in memory.
///
/// Nothing survives a restart. Used by tests and for throwaway local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using in-memory store");
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, blob: String) -> StoreResult<()> {
        self.entries.write().await.insert(key.to_string(), blob);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
