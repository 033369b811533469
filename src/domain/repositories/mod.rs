//! Persistence contracts for the domain layer.
//!
//! The core never talks to a database. It serializes its collections as whole
//! blobs and hands them to a [`KeyValueStore`]; concrete backends live in
//! `crate::infrastructure::persistence`.

pub mod key_value_store;

pub use key_value_store::{EVENT_LOG_KEY, KeyValueStore, LINKS_KEY, StoreError, StoreResult};

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
