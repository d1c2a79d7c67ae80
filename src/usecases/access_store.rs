//! Access Control Store - Tier Passwords
//!
//! Owns the tier password collection and answers whether a password
//! unlocks a paid tier. The first read of an absent collection seeds
//! a single demo record so a fresh install behaves deterministically.
//!
//! Passwords are compared in plaintext with exact equality and are
//! never logged.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::access::{NewTierPassword, TierPassword};
use crate::domain::tier::Tier;
use crate::ports::storage::{self, KeyValueStore, StorageError};

/// Tier password collection owner.
pub struct AccessControlStore<S: KeyValueStore + ?Sized> {
    /// Collection backend.
    storage: Arc<S>,
    /// Storage key of the password collection.
    key: String,
    /// Serializes read-modify-write cycles, including first-run seeding.
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore + ?Sized> AccessControlStore<S> {
    pub fn new(storage: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// All password records, seeding the demo record on first access.
    pub async fn list(&self) -> Result<Vec<TierPassword>, StorageError> {
        let _guard = self.write_lock.lock().await;
        self.load_or_seed().await
    }

    /// Issue a new active password.
    #[instrument(skip(self, entry), fields(username = %entry.username, tier = %entry.tier))]
    pub async fn add(&self, entry: NewTierPassword) -> Result<TierPassword, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut passwords = self.load_or_seed().await?;

        let record = TierPassword::issue(entry, Uuid::new_v4().to_string());
        passwords.push(record.clone());
        self.save(&passwords).await?;

        info!(id = %record.id, "Tier password issued");
        Ok(record)
    }

    /// Remove a password record. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut passwords = self.load_or_seed().await?;

        let before = passwords.len();
        passwords.retain(|p| p.id != id);
        if passwords.len() == before {
            debug!("No password with that id, nothing to do");
            return Ok(false);
        }

        self.save(&passwords).await?;
        info!("Tier password revoked");
        Ok(true)
    }

    /// Whether `password` unlocks `tier`.
    ///
    /// The free tier is always open and never touches storage. A paid
    /// tier needs an active record with the same tier and an exactly
    /// equal password.
    #[instrument(skip(self, password))]
    pub async fn verify(&self, tier: Tier, password: &str) -> Result<bool, StorageError> {
        if tier.is_lowest() {
            return Ok(true);
        }
        let granted = self.list().await?.iter().any(|p| p.grants(tier, password));
        debug!(granted, "Tier password checked");
        Ok(granted)
    }

    /// Check if the backing store is usable.
    pub async fn is_healthy(&self) -> bool {
        self.storage.is_healthy().await
    }

    /// Caller must hold `write_lock`.
    async fn load_or_seed(&self) -> Result<Vec<TierPassword>, StorageError> {
        if let Some(passwords) = storage::load_collection(&*self.storage, &self.key).await? {
            return Ok(passwords);
        }

        let seed = vec![TierPassword::demo()];
        self.save(&seed).await?;
        info!(key = %self.key, "Seeded tier password collection");
        Ok(seed)
    }

    async fn save(&self, passwords: &[TierPassword]) -> Result<(), StorageError> {
        storage::save_collection(&*self.storage, &self.key, passwords).await
    }
}
