//! Directory Services - Wired Use Cases Handed to a Front End
//!
//! Builds both stores over one storage backend and the workflows that
//! sit on top of them. A presentation layer receives this handle and
//! never constructs stores itself, so every caller shares the same
//! per-store write locks.

use std::sync::Arc;

use tokio::sync::watch;

use crate::adapters::metrics::MetricsRegistry;
use crate::config::{AppConfig, RefreshConfig};
use crate::ports::clock::Clock;
use crate::ports::storage::KeyValueStore;
use crate::usecases::access_store::AccessControlStore;
use crate::usecases::admin::AdminConsole;
use crate::usecases::listing_store::ListingStore;
use crate::usecases::refresher::{DirectoryRefresher, DirectorySnapshot};
use crate::usecases::submission::SubmissionService;

/// Stores and workflows sharing one storage backend.
pub struct DirectoryServices<S: KeyValueStore + ?Sized> {
    pub listings: Arc<ListingStore<S>>,
    pub access: Arc<AccessControlStore<S>>,
    pub submissions: SubmissionService<S>,
    pub admin: AdminConsole<S>,
}

impl<S: KeyValueStore + ?Sized> DirectoryServices<S> {
    pub fn new(storage: Arc<S>, clock: Arc<dyn Clock>, config: &AppConfig) -> Self {
        let listings = Arc::new(ListingStore::new(
            Arc::clone(&storage),
            clock,
            config.storage.listings_key.as_str(),
        ));
        let access = Arc::new(AccessControlStore::new(
            storage,
            config.storage.passwords_key.as_str(),
        ));

        Self {
            submissions: SubmissionService::new(Arc::clone(&listings), Arc::clone(&access)),
            admin: AdminConsole::new(Arc::clone(&listings), Arc::clone(&access), &config.admin),
            listings,
            access,
        }
    }

    /// Count submissions and admin actions in the given registry.
    #[must_use]
    pub fn with_metrics(self, metrics: Arc<MetricsRegistry>) -> Self {
        let Self {
            listings,
            access,
            submissions,
            admin,
        } = self;
        Self {
            listings,
            access,
            submissions: submissions.with_metrics(Arc::clone(&metrics)),
            admin: admin.with_metrics(metrics),
        }
    }

    /// Refresher over the shared listing store.
    pub fn refresher(
        &self,
        config: &RefreshConfig,
    ) -> (DirectoryRefresher<S>, watch::Receiver<DirectorySnapshot>) {
        DirectoryRefresher::new(Arc::clone(&self.listings), config)
    }
}
