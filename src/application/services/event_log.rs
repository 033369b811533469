//! Append-only diagnostic log of domain events.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::{EventName, LogEntry};
use crate::domain::repositories::{EVENT_LOG_KEY, KeyValueStore, StoreResult};
use crate::error::AppError;
use crate::utils::clock::Clock;

/// Number of entries kept; older ones are dropped first.
pub const EVENT_LOG_CAPACITY: usize = 1000;

/// Best-effort audit trail stored next to the links, newest entry first.
///
/// [`EventLog::write`] never fails: a storage problem is reported through
/// `tracing` and the entry is lost. Every write is also mirrored as a
/// structured `tracing` event.
pub struct EventLog<S: KeyValueStore + ?Sized = dyn KeyValueStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore + ?Sized> EventLog<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            capacity: EVENT_LOG_CAPACITY,
            write_lock: Mutex::new(()),
        }
    }

    /// Overrides the retention limit (at least one entry is always kept).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records `event_name` with `payload` at the front of the log.
    pub async fn write(&self, event_name: EventName, payload: Value) {
        tracing::info!(event = %event_name, %payload, "domain event");

        let entry = LogEntry::new(event_name, payload, self.clock.now());

        if let Err(e) = self.try_write(entry).await {
            warn!("Dropping {} log entry: {}", event_name, e);
        }
    }

    /// Returns all entries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the log cannot be loaded.
    pub async fn read(&self) -> Result<Vec<LogEntry>, AppError> {
        Ok(self.load().await?)
    }

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the empty log cannot be saved.
    pub async fn clear(&self) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.save(&[]).await?;
        debug!("Event log cleared");
        Ok(())
    }

    async fn try_write(&self, entry: LogEntry) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await?;
        entries.insert(0, entry);
        entries.truncate(self.capacity);

        self.save(&entries).await
    }

    async fn load(&self) -> StoreResult<Vec<LogEntry>> {
        match self.store.get(EVENT_LOG_KEY).await? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, entries: &[LogEntry]) -> StoreResult<()> {
        let blob = serde_json::to_string(entries)?;
        self.store.set(EVENT_LOG_KEY, blob).await
    }
}
