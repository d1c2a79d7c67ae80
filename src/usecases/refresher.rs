//! Directory Refresher - Periodic Rebuild of the Public View
//!
//! Free-tier expiry is evaluated at read time, so something has to
//! re-read the approved listings for an expired entry to disappear.
//! The refresher rebuilds the public view on a fixed interval and
//! broadcasts it via a `tokio::sync::watch` channel. The stores
//! themselves have no background timer.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

use crate::adapters::metrics::{HealthState, MetricsRegistry};
use crate::config::RefreshConfig;
use crate::domain::listing::{Listing, TierFilter};
use crate::domain::tier::Tier;
use crate::ports::storage::KeyValueStore;
use crate::usecases::listing_store::ListingStore;

/// Public view of the directory at one point in time.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    /// Approved, public, unexpired listings in storage order.
    pub listings: Vec<Listing>,
    /// Visible listings per tier. Every tier is present.
    pub by_tier: BTreeMap<Tier, usize>,
    /// Listings awaiting review.
    pub pending: usize,
    /// Free-tier listings hidden by expiry.
    pub expired: usize,
    /// Instant the expiry checks were evaluated at. `None` before the
    /// first refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl DirectorySnapshot {
    /// Listings shown for a tier selector.
    pub fn browse(&self, filter: TierFilter) -> Vec<&Listing> {
        filter.apply(&self.listings)
    }
}

/// Rebuilds the public view every `interval`.
pub struct DirectoryRefresher<S: KeyValueStore + ?Sized> {
    listings: Arc<ListingStore<S>>,
    interval: Duration,
    snapshot_tx: watch::Sender<DirectorySnapshot>,
    metrics: Option<Arc<MetricsRegistry>>,
    health: Option<Arc<HealthState>>,
}

impl<S: KeyValueStore + ?Sized> DirectoryRefresher<S> {
    /// Create a refresher and the receiver consumers read snapshots from.
    pub fn new(
        listings: Arc<ListingStore<S>>,
        config: &RefreshConfig,
    ) -> (Self, watch::Receiver<DirectorySnapshot>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(DirectorySnapshot::default());

        let refresher = Self {
            listings,
            interval: Duration::from_secs(config.interval_seconds),
            snapshot_tx,
            metrics: None,
            health: None,
        };

        (refresher, snapshot_rx)
    }

    /// Publish gauges to the given registry.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Report storage health to readiness probes.
    #[must_use]
    pub fn with_health(mut self, health: Arc<HealthState>) -> Self {
        self.health = Some(health);
        self
    }

    /// Run the refresh loop until shutdown.
    ///
    /// The first refresh happens immediately. A failed refresh keeps
    /// the previous snapshot and marks storage unhealthy.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        info!(
            interval_secs = self.interval.as_secs(),
            "Directory refresher started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    info!("Directory refresher shutting down");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh_once().await {
                        warn!(error = %e, "Refresh failed, keeping previous snapshot");
                        if let Some(metrics) = &self.metrics {
                            metrics.refresh_failures.inc();
                        }
                        if let Some(health) = &self.health {
                            health.set_storage_healthy(false);
                        }
                    }
                }
            }
        }
    }

    /// Rebuild and publish the snapshot once.
    pub async fn refresh_once(&self) -> Result<DirectorySnapshot> {
        let overview = self
            .listings
            .overview()
            .await
            .context("Failed to read listings for refresh")?;

        let mut by_tier: BTreeMap<Tier, usize> = Tier::ALL.iter().map(|t| (*t, 0)).collect();
        for listing in &overview.public {
            *by_tier.entry(listing.tier).or_default() += 1;
        }

        let snapshot = DirectorySnapshot {
            listings: overview.public,
            by_tier,
            pending: overview.pending.len(),
            expired: overview.expired.len(),
            refreshed_at: Some(overview.as_of),
        };

        if let Some(metrics) = &self.metrics {
            for (tier, count) in &snapshot.by_tier {
                metrics
                    .visible_listings
                    .with_label_values(&[tier.to_string().as_str()])
                    .set(i64::try_from(*count).unwrap_or(i64::MAX));
            }
            metrics
                .pending_listings
                .set(i64::try_from(snapshot.pending).unwrap_or(i64::MAX));
            metrics
                .expired_listings
                .set(i64::try_from(snapshot.expired).unwrap_or(i64::MAX));
        }
        if let Some(health) = &self.health {
            health.set_storage_healthy(true);
        }

        debug!(
            visible = snapshot.listings.len(),
            pending = snapshot.pending,
            expired = snapshot.expired,
            "Directory snapshot rebuilt"
        );

        self.snapshot_tx.send_replace(snapshot.clone());
        Ok(snapshot)
    }
}
