//! Prometheus Metrics Registry - Directory Observability
//!
//! Registers and exposes Prometheus metrics for dashboards: submission
//! outcomes per tier, admin actions, and the size of the public view.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use prometheus::{
    Encoder, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

/// Centralized Prometheus metrics for the directory.
///
/// All metrics follow the naming convention `directory_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Submission attempts by tier and outcome.
    pub submissions: IntCounterVec,
    /// Admin actions by kind.
    pub admin_actions: IntCounterVec,
    /// Publicly visible listings per tier.
    pub visible_listings: IntGaugeVec,
    /// Listings awaiting review.
    pub pending_listings: IntGauge,
    /// Free-tier listings hidden by expiry.
    pub expired_listings: IntGauge,
    /// Refresh passes that failed to read storage.
    pub refresh_failures: IntCounter,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new(
                "directory_submissions_total",
                "Listing submission attempts",
            ),
            &["tier", "outcome"],
        )?;

        let admin_actions = IntCounterVec::new(
            Opts::new(
                "directory_admin_actions_total",
                "Admin console actions that changed stored state",
            ),
            &["action"],
        )?;

        let visible_listings = IntGaugeVec::new(
            Opts::new(
                "directory_visible_listings",
                "Listings currently shown to the public",
            ),
            &["tier"],
        )?;

        let pending_listings = IntGauge::new(
            "directory_pending_listings",
            "Listings awaiting admin review",
        )?;

        let expired_listings = IntGauge::new(
            "directory_expired_listings",
            "Approved free-tier listings hidden by expiry",
        )?;

        let refresh_failures = IntCounter::new(
            "directory_refresh_failures_total",
            "Refresh passes that failed to read storage",
        )?;

        // Register all metrics
        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(admin_actions.clone()))?;
        registry.register(Box::new(visible_listings.clone()))?;
        registry.register(Box::new(pending_listings.clone()))?;
        registry.register(Box::new(expired_listings.clone()))?;
        registry.register(Box::new(refresh_failures.clone()))?;

        Ok(Self {
            registry,
            submissions,
            admin_actions,
            visible_listings,
            pending_listings,
            expired_listings,
            refresh_failures,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics_self);
                async move { metrics.render() }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
