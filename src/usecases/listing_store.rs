//! Listing Store - Listing Lifecycle over a Stored Collection
//!
//! Every operation reads the whole listings collection, works on an
//! in-memory copy and writes the whole collection back. Mutations hold
//! a per-store lock across that read-modify-write so concurrent admin
//! actions through the same store cannot overwrite each other.
//!
//! Unknown ids are silent no-ops; the boolean results only report
//! whether anything changed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::listing::{self, Listing, ListingDraft, ListingStatus};
use crate::ports::clock::Clock;
use crate::ports::storage::{self, KeyValueStore, StorageError};

/// Consistent view of the collection at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOverview {
    /// Approved, public, unexpired listings.
    pub public: Vec<Listing>,
    pub pending: Vec<Listing>,
    /// Approved free-tier listings hidden by expiry.
    pub expired: Vec<Listing>,
    /// Time the expiry checks were evaluated at.
    pub as_of: DateTime<Utc>,
}

/// Listing collection owner.
///
/// Construct once per process and share by `Arc`: the write lock only
/// serializes callers going through the same instance.
pub struct ListingStore<S: KeyValueStore + ?Sized> {
    /// Collection backend.
    storage: Arc<S>,
    /// Source of `createdAt` and expiry checks.
    clock: Arc<dyn Clock>,
    /// Storage key of the listings collection.
    key: String,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore + ?Sized> ListingStore<S> {
    pub fn new(storage: Arc<S>, clock: Arc<dyn Clock>, key: impl Into<String>) -> Self {
        Self {
            storage,
            clock,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a pending listing from a draft.
    ///
    /// Sets `createdAt` to now and `expiresAt` from the tier duration.
    /// Performs no field validation.
    #[instrument(skip(self, draft), fields(tier = %draft.tier))]
    pub async fn submit(&self, draft: ListingDraft) -> Result<Listing, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut listings = self.load().await?;

        let listing = Listing::from_draft(draft, Uuid::new_v4().to_string(), self.clock.now());
        listings.push(listing.clone());
        self.save(&listings).await?;

        info!(
            id = %listing.id,
            expires_at = %listing.expires_at,
            "Listing submitted for review"
        );
        Ok(listing)
    }

    /// Listings awaiting review, in storage order.
    pub async fn list_pending(&self) -> Result<Vec<Listing>, StorageError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|l| l.status == ListingStatus::Pending)
            .collect())
    }

    /// Approved listings, minus expired free-tier entries.
    ///
    /// Paid tiers are returned regardless of `expiresAt`. Private
    /// listings are only included when `include_private` is set.
    pub async fn list_approved(&self, include_private: bool) -> Result<Vec<Listing>, StorageError> {
        let listings = self.load().await?;
        Ok(listing::approved_view(&listings, self.clock.now(), include_private))
    }

    /// Approved free-tier listings currently hidden by expiry.
    pub async fn list_expired(&self) -> Result<Vec<Listing>, StorageError> {
        let listings = self.load().await?;
        Ok(listing::expired_view(&listings, self.clock.now()))
    }

    /// Public, pending and expired views built from one read of the
    /// collection and one reading of the clock.
    pub async fn overview(&self) -> Result<ListingOverview, StorageError> {
        let listings = self.load().await?;
        let as_of = self.clock.now();

        Ok(ListingOverview {
            public: listing::approved_view(&listings, as_of, false),
            pending: listings
                .iter()
                .filter(|l| l.status == ListingStatus::Pending)
                .cloned()
                .collect(),
            expired: listing::expired_view(&listings, as_of),
            as_of,
        })
    }

    /// Mark a listing approved.
    #[instrument(skip(self))]
    pub async fn approve(&self, id: &str) -> Result<bool, StorageError> {
        self.mutate(|listings| match listings.iter_mut().find(|l| l.id == id) {
            Some(l) => {
                l.status = ListingStatus::Approved;
                true
            }
            None => false,
        })
        .await
    }

    /// Reject a listing. The record is removed, not kept as rejected.
    #[instrument(skip(self))]
    pub async fn reject(&self, id: &str) -> Result<bool, StorageError> {
        self.mutate(|listings| match listings.iter().position(|l| l.id == id) {
            Some(index) => {
                listings.remove(index);
                true
            }
            None => false,
        })
        .await
    }

    /// Flip the private flag.
    #[instrument(skip(self))]
    pub async fn toggle_private(&self, id: &str) -> Result<bool, StorageError> {
        self.mutate(|listings| match listings.iter_mut().find(|l| l.id == id) {
            Some(l) => {
                l.is_private = !l.is_private;
                true
            }
            None => false,
        })
        .await
    }

    /// Remove a listing whatever its status.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        self.mutate(|listings| {
            let before = listings.len();
            listings.retain(|l| l.id != id);
            listings.len() != before
        })
        .await
    }

    /// Check if the backing store is usable.
    pub async fn is_healthy(&self) -> bool {
        self.storage.is_healthy().await
    }

    /// Locked read-modify-write. Writes only when `op` reports a change.
    async fn mutate<F>(&self, op: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut Vec<Listing>) -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut listings = self.load().await?;

        let changed = op(&mut listings);
        if changed {
            self.save(&listings).await?;
        } else {
            debug!("No listing with that id, nothing to do");
        }
        Ok(changed)
    }

    async fn load(&self) -> Result<Vec<Listing>, StorageError> {
        Ok(storage::load_collection(&*self.storage, &self.key)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, listings: &[Listing]) -> Result<(), StorageError> {
        storage::save_collection(&*self.storage, &self.key, listings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::MemoryStore;
    use crate::domain::tier::Tier;
    use crate::ports::clock::ManualClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    const KEY: &str = "albury_listings";

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0).unwrap()
    }

    fn setup() -> (Arc<ListingStore<MemoryStore>>, Arc<ManualClock>, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start()));
        let store = Arc::new(ListingStore::new(Arc::clone(&storage), clock.clone(), KEY));
        (store, clock, storage)
    }

    fn draft(name: &str, tier: Tier) -> ListingDraft {
        ListingDraft {
            name: name.to_string(),
            logo: "https://example.com/logo.png".to_string(),
            description: "Fresh bread daily".to_string(),
            email: "hello@example.com".to_string(),
            address: "1 Dean St, Albury".to_string(),
            tier,
            ..ListingDraft::default()
        }
    }

    #[tokio::test]
    async fn test_submit_sets_lifecycle_fields() {
        let (store, _, _) = setup();
        for tier in Tier::ALL {
            let l = store.submit(draft("Shop", tier)).await.unwrap();
            assert_eq!(l.status, ListingStatus::Pending);
            assert!(!l.is_private);
            assert_eq!(l.created_at, start());
            assert_eq!(l.expires_at - l.created_at, tier.duration());
        }
        assert_eq!(store.list_pending().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_submit_generates_unique_ids() {
        let (store, _, _) = setup();
        let a = store.submit(draft("A", Tier::Small)).await.unwrap();
        let b = store.submit(draft("B", Tier::Small)).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_pending_keeps_storage_order() {
        let (store, _, _) = setup();
        for name in ["first", "second", "third"] {
            store.submit(draft(name, Tier::Big)).await.unwrap();
        }
        let names: Vec<_> = store
            .list_pending()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_approve_moves_out_of_pending() {
        let (store, _, _) = setup();
        let l = store.submit(draft("Cafe", Tier::Medium)).await.unwrap();

        assert!(store.approve(&l.id).await.unwrap());
        assert!(store.list_pending().await.unwrap().is_empty());

        let approved = store.list_approved(false).await.unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].status, ListingStatus::Approved);
    }

    #[tokio::test]
    async fn test_reject_is_destructive() {
        let (store, _, _) = setup();
        let l = store.submit(draft("Spam", Tier::Small)).await.unwrap();

        assert!(store.reject(&l.id).await.unwrap());
        assert!(store.list_pending().await.unwrap().is_empty());

        // Nothing left to approve.
        assert!(!store.approve(&l.id).await.unwrap());
        assert!(store.list_approved(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_noops() {
        let (store, _, storage) = setup();
        store.submit(draft("Keep", Tier::Small)).await.unwrap();
        let before = storage.read_collection(KEY).await.unwrap();

        assert!(!store.approve("missing").await.unwrap());
        assert!(!store.reject("missing").await.unwrap());
        assert!(!store.toggle_private("missing").await.unwrap());
        assert!(!store.delete("missing").await.unwrap());

        assert_eq!(storage.read_collection(KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_toggle_private_hides_from_public() {
        let (store, _, _) = setup();
        let l = store.submit(draft("Quiet", Tier::Big)).await.unwrap();
        store.approve(&l.id).await.unwrap();

        store.toggle_private(&l.id).await.unwrap();
        assert!(store.list_approved(false).await.unwrap().is_empty());
        assert_eq!(store.list_approved(true).await.unwrap().len(), 1);

        store.toggle_private(&l.id).await.unwrap();
        assert_eq!(store.list_approved(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_approved_listing() {
        let (store, _, _) = setup();
        let l = store.submit(draft("Closed", Tier::Massive)).await.unwrap();
        store.approve(&l.id).await.unwrap();

        assert!(store.delete(&l.id).await.unwrap());
        assert!(store.list_approved(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expiry_applies_to_free_tier_only() {
        let (store, clock, _) = setup();
        let free = store.submit(draft("Free", Tier::Small)).await.unwrap();
        let paid = store.submit(draft("Paid", Tier::Medium)).await.unwrap();
        store.approve(&free.id).await.unwrap();
        store.approve(&paid.id).await.unwrap();

        clock.advance(Duration::days(1));
        assert_eq!(store.list_approved(false).await.unwrap().len(), 2);

        // Both are past expiresAt now; only the free one drops out.
        clock.advance(Duration::days(60));
        let visible = store.list_approved(false).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, paid.id);
        assert!(visible[0].expires_at < clock.now());

        let expired = store.list_expired().await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, free.id);
    }

    #[tokio::test]
    async fn test_overview_uses_one_instant() {
        let (store, clock, _) = setup();
        let free = store.submit(draft("Free", Tier::Small)).await.unwrap();
        let paid = store.submit(draft("Paid", Tier::Big)).await.unwrap();
        store.submit(draft("Waiting", Tier::Medium)).await.unwrap();
        store.approve(&free.id).await.unwrap();
        store.approve(&paid.id).await.unwrap();

        clock.advance(Duration::days(3));
        let overview = store.overview().await.unwrap();
        assert_eq!(overview.as_of, clock.now());
        assert_eq!(overview.public.len(), 1);
        assert_eq!(overview.public[0].id, paid.id);
        assert_eq!(overview.pending.len(), 1);
        assert_eq!(overview.expired.len(), 1);
        assert_eq!(overview.expired[0].id, free.id);
    }

    #[tokio::test]
    async fn test_concurrent_mutations_are_not_lost() {
        let (store, _, _) = setup();
        let mut ids = Vec::new();
        for i in 0..20 {
            ids.push(store.submit(draft(&format!("shop-{i}"), Tier::Big)).await.unwrap().id);
        }

        let mut handles = Vec::new();
        for id in ids.clone() {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.approve(&id).await.unwrap();
                store.toggle_private(&id).await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let all = store.list_approved(true).await.unwrap();
        assert_eq!(all.len(), ids.len());
        assert!(all.iter().all(|l| l.is_private));
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_an_error() {
        let (store, _, storage) = setup();
        storage.write_collection(KEY, "{not json").await.unwrap();

        let err = store.list_pending().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
        assert!(store.submit(draft("x", Tier::Small)).await.is_err());
    }
}
