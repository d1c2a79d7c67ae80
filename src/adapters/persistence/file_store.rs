//! File Store - Atomic JSON Collection Files
//!
//! Each collection lives in `<data_dir>/<key>.json`. Writes go to a
//! temporary file first and are then renamed over the target, so a
//! collection file is always either the old or the new version.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument};

use crate::ports::storage::{KeyValueStore, StorageError};

/// Directory-backed key-value store.
pub struct FileStore {
    /// Directory holding one JSON file per collection.
    data_dir: PathBuf,
}

impl FileStore {
    /// Open a store in the given data directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .map_err(|source| StorageError::Io {
                key: dir.display().to_string(),
                source,
            })?;

        Ok(Self {
            data_dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json.tmp"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    async fn read_collection(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key, "Collection file not found");
                Ok(None)
            }
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    async fn write_collection(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        let tmp_path = self.tmp_path_for(key);

        fs::write(&tmp_path, payload).await.map_err(io_err)?;

        // Atomic rename
        fs::rename(&tmp_path, self.path_for(key))
            .await
            .map_err(io_err)?;

        debug!(key, "Collection written");
        Ok(())
    }

    /// Check that the data directory is writable.
    async fn is_healthy(&self) -> bool {
        let probe = self.data_dir.join(".health_check");
        let result = fs::write(&probe, b"ok").await;
        let _ = fs::remove_file(&probe).await;
        result.is_ok()
    }
}
