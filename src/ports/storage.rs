//! Storage Port - Key-Value Collection Persistence Interface
//!
//! The directory keeps two collections (listings and tier passwords),
//! each stored whole as a JSON array under its own key. Adapters only
//! move opaque JSON text in and out; typed encoding lives here so every
//! backend reads and writes the same shape.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Failure reading or writing a collection.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on collection {key}: {source}")]
    Io {
        key: String,
        source: std::io::Error,
    },

    #[error("Collection {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("Failed to encode collection {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Trait for collection storage providers.
///
/// Mirrors a browser-style local store: one string value per key,
/// read and written in full.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the raw collection under `key`. `None` if never written.
    async fn read_collection(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the collection under `key`.
    async fn write_collection(&self, key: &str, payload: &str) -> Result<(), StorageError>;

    /// Check if the backend is usable (permissions, disk).
    async fn is_healthy(&self) -> bool;
}

/// Read and decode a collection. `None` if the key was never written.
///
/// Unparseable data is an error, never an empty collection.
pub async fn load_collection<T, S>(store: &S, key: &str) -> Result<Option<Vec<T>>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.read_collection(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })
}

/// Encode and write a whole collection.
pub async fn save_collection<T, S>(store: &S, key: &str, items: &[T]) -> Result<(), StorageError>
where
    T: Serialize + Sync,
    S: KeyValueStore + ?Sized,
{
    let payload = serde_json::to_string(items).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.write_collection(key, &payload).await
}
