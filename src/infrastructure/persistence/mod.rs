//! [`KeyValueStore`] backends.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local, used by tests
//! - [`FileStore`] - one JSON file per key with atomic replace
//! - [`RedisStore`] - Redis strings under a key prefix
//!
//! [`KeyValueStore`]: crate::domain::repositories::KeyValueStore

pub mod file_store;
pub mod memory_store;
pub mod redis_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use redis_store::{DEFAULT_KEY_PREFIX, RedisStore};
