//! File-backed key-value store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::domain::repositories::{KeyValueStore, StoreError, StoreResult};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling file which is then renamed over the target,
/// so readers see either the old blob or the new one, never a torn write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();

        fs::create_dir_all(&dir).await.map_err(|e| {
            StoreError::Connection(format!("Cannot create {}: {}", dir.display(), e))
        })?;

        info!("File store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid {
            return Err(StoreError::Operation(format!("Invalid key '{}'", key)));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Operation(format!(
                "Read {} failed: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, blob: String) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, blob.as_bytes()).await.map_err(|e| {
            StoreError::Operation(format!("Write {} failed: {}", tmp.display(), e))
        })?;

        fs::rename(&tmp, &path).await.map_err(|e| {
            StoreError::Operation(format!("Rename to {} failed: {}", path.display(), e))
        })?;

        debug!("Wrote {} ({} bytes)", path.display(), blob.len());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        fs::metadata(&self.dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}
