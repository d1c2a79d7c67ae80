//! Admin Console - Review Queue and Tier Password Management
//!
//! The console is unlocked by comparing a single shared secret from
//! configuration in plaintext. That gate only keeps casual visitors
//! out; a real deployment needs a proper authentication layer in
//! front of it.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::config::AdminConfig;
use crate::domain::access::{NewTierPassword, TierPassword};
use crate::domain::listing::Listing;
use crate::ports::storage::KeyValueStore;
use crate::usecases::access_store::AccessControlStore;
use crate::usecases::listing_store::ListingStore;

/// Everything the admin dashboard shows.
#[derive(Debug, Clone)]
pub struct AdminDashboard {
    /// Review queue.
    pub pending: Vec<Listing>,
    /// Approved listings, private ones included.
    pub approved: Vec<Listing>,
    /// Approved free-tier listings hidden by expiry.
    pub expired: Vec<Listing>,
    /// Issued tier passwords.
    pub passwords: Vec<TierPassword>,
}

/// Locked admin console.
pub struct AdminConsole<S: KeyValueStore + ?Sized> {
    listings: Arc<ListingStore<S>>,
    access: Arc<AccessControlStore<S>>,
    secret: String,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<S: KeyValueStore + ?Sized> AdminConsole<S> {
    pub fn new(
        listings: Arc<ListingStore<S>>,
        access: Arc<AccessControlStore<S>>,
        config: &AdminConfig,
    ) -> Self {
        Self {
            listings,
            access,
            secret: config.password.clone(),
            metrics: None,
        }
    }

    /// Count admin actions in the given registry.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Open a session if `attempt` equals the admin secret.
    pub fn unlock(&self, attempt: &str) -> Option<AdminSession<'_, S>> {
        if attempt == self.secret {
            info!("Admin console unlocked");
            Some(AdminSession { console: self })
        } else {
            warn!("Admin unlock attempt rejected");
            None
        }
    }

    /// Count an action that changed stored state.
    fn record(&self, action: &str, changed: bool) {
        if !changed {
            return;
        }
        if let Some(metrics) = &self.metrics {
            metrics.admin_actions.with_label_values(&[action]).inc();
        }
    }
}

/// Unlocked admin console.
pub struct AdminSession<'a, S: KeyValueStore + ?Sized> {
    console: &'a AdminConsole<S>,
}

impl<S: KeyValueStore + ?Sized> AdminSession<'_, S> {
    /// Load the review queue, approved and expired listings and the
    /// issued passwords.
    pub async fn dashboard(&self) -> Result<AdminDashboard> {
        let listings = &self.console.listings;
        let (pending, approved, expired, passwords) = tokio::try_join!(
            listings.list_pending(),
            listings.list_approved(true),
            listings.list_expired(),
            self.console.access.list(),
        )
        .context("Failed to load admin dashboard")?;

        Ok(AdminDashboard {
            pending,
            approved,
            expired,
            passwords,
        })
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, id: &str) -> Result<bool> {
        let changed = self
            .console
            .listings
            .approve(id)
            .await
            .context("Failed to approve listing")?;
        self.console.record("approve", changed);
        Ok(changed)
    }

    /// Reject a pending listing. The listing is deleted, not archived.
    #[instrument(skip(self))]
    pub async fn reject(&self, id: &str) -> Result<bool> {
        let changed = self
            .console
            .listings
            .reject(id)
            .await
            .context("Failed to reject listing")?;
        self.console.record("reject", changed);
        Ok(changed)
    }

    #[instrument(skip(self))]
    pub async fn toggle_private(&self, id: &str) -> Result<bool> {
        let changed = self
            .console
            .listings
            .toggle_private(id)
            .await
            .context("Failed to toggle listing visibility")?;
        self.console.record("toggle_private", changed);
        Ok(changed)
    }

    #[instrument(skip(self))]
    pub async fn delete_listing(&self, id: &str) -> Result<bool> {
        let changed = self
            .console
            .listings
            .delete(id)
            .await
            .context("Failed to delete listing")?;
        self.console.record("delete_listing", changed);
        Ok(changed)
    }

    /// Issue a tier password. Username and password must be non-empty.
    #[instrument(skip(self, entry), fields(username = %entry.username, tier = %entry.tier))]
    pub async fn issue_password(&self, entry: NewTierPassword) -> Result<TierPassword> {
        anyhow::ensure!(!entry.username.is_empty(), "username must not be empty");
        anyhow::ensure!(!entry.password.is_empty(), "password must not be empty");

        let issued = self
            .console
            .access
            .add(entry)
            .await
            .context("Failed to issue tier password")?;
        self.console.record("issue_password", true);
        Ok(issued)
    }

    #[instrument(skip(self))]
    pub async fn revoke_password(&self, id: &str) -> Result<bool> {
        let changed = self
            .console
            .access
            .delete(id)
            .await
            .context("Failed to revoke tier password")?;
        self.console.record("revoke_password", changed);
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::MemoryStore;
    use crate::domain::listing::ListingDraft;
    use crate::domain::tier::Tier;
    use crate::ports::clock::SystemClock;

    fn console() -> AdminConsole<MemoryStore> {
        let storage = Arc::new(MemoryStore::new());
        let listings = Arc::new(ListingStore::new(
            Arc::clone(&storage),
            Arc::new(SystemClock),
            "albury_listings",
        ));
        let access = Arc::new(AccessControlStore::new(storage, "albury_passwords"));
        let config = AdminConfig {
            password: "open sesame".to_string(),
        };
        AdminConsole::new(listings, access, &config)
    }

    #[test]
    fn test_unlock_requires_exact_secret() {
        let console = console();
        assert!(console.unlock("open sesame").is_some());
        assert!(console.unlock("Open Sesame").is_none());
        assert!(console.unlock("").is_none());
    }

    #[tokio::test]
    async fn test_dashboard_reflects_actions() {
        let console = console();
        let session = console.unlock("open sesame").unwrap();

        let keep = console
            .listings
            .submit(ListingDraft {
                name: "Keep".to_string(),
                tier: Tier::Big,
                ..ListingDraft::default()
            })
            .await
            .unwrap();
        let spam = console
            .listings
            .submit(ListingDraft {
                name: "Spam".to_string(),
                ..ListingDraft::default()
            })
            .await
            .unwrap();

        session.approve(&keep.id).await.unwrap();
        session.toggle_private(&keep.id).await.unwrap();
        session.reject(&spam.id).await.unwrap();

        let board = session.dashboard().await.unwrap();
        assert!(board.pending.is_empty());
        assert_eq!(board.approved.len(), 1);
        assert!(board.approved[0].is_private);
        assert!(board.expired.is_empty());
        assert_eq!(board.passwords, vec![TierPassword::demo()]);
    }

    #[tokio::test]
    async fn test_only_effective_actions_are_counted() {
        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        let console = console().with_metrics(Arc::clone(&metrics));
        let session = console.unlock("open sesame").unwrap();
        let approvals = || {
            metrics
                .admin_actions
                .with_label_values(&["approve"])
                .get()
        };

        assert!(!session.approve("missing").await.unwrap());
        assert!(!session.revoke_password("missing").await.unwrap());
        assert_eq!(approvals(), 0);
        assert_eq!(
            metrics
                .admin_actions
                .with_label_values(&["revoke_password"])
                .get(),
            0
        );

        let listing = console
            .listings
            .submit(ListingDraft::default())
            .await
            .unwrap();
        assert!(session.approve(&listing.id).await.unwrap());
        assert_eq!(approvals(), 1);
    }

    #[tokio::test]
    async fn test_issue_password_validates_input() {
        let console = console();
        let session = console.unlock("open sesame").unwrap();

        let blank = NewTierPassword {
            username: String::new(),
            tier: Tier::Medium,
            password: "pw".to_string(),
        };
        assert!(session.issue_password(blank).await.is_err());

        let issued = session
            .issue_password(NewTierPassword {
                username: "baker".to_string(),
                tier: Tier::Medium,
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.dashboard().await.unwrap().passwords.len(), 2);

        assert!(session.revoke_password(&issued.id).await.unwrap());
        assert_eq!(session.dashboard().await.unwrap().passwords.len(), 1);
    }
}
