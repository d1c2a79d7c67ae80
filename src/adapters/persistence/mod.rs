//! Persistence Adapters - Collection Storage Backends
//!
//! Implements the `KeyValueStore` port with a directory of atomic JSON
//! files or a plain in-memory map.

pub mod file_store;
pub mod memory_store;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::ports::storage::{KeyValueStore, StorageError};

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Open the backend selected in configuration.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    Ok(match config.backend {
        StorageBackend::File => Arc::new(FileStore::new(&config.data_dir).await?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    })
}
