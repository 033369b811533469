//! Persistence boundary: an abstract key-value store holding serialized blobs.

use async_trait::async_trait;

/// Key under which the whole link collection is stored.
pub const LINKS_KEY: &str = "links";

/// Key under which the event log is stored.
pub const EVENT_LOG_KEY: &str = "event_log";

/// Errors raised by a key-value backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store operation error: {0}")]
    Operation(String),

    #[error("Stored blob could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Blob storage used by the link store and the event log.
///
/// A `set` replaces the whole value under `key`; implementations must never leave a
/// partially written value behind.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryStore`] - process-local map
/// - [`crate::infrastructure::persistence::FileStore`] - one file per key
/// - [`crate::infrastructure::persistence::RedisStore`] - Redis strings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if nothing was ever written.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the blob stored under `key`.
    async fn set(&self, key: &str, blob: String) -> StoreResult<()>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
