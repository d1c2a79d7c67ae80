//! Albury Business Directory - Entry Point
//!
//! Wires configuration, logging, storage and the directory use cases,
//! then runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Open the storage backend (file or memory)
//! 4. Build the stores, submission workflow and admin console
//! 5. Seed the tier password collection on first run
//! 6. Hold the wired services for the presentation layer
//! 7. Spawn health server (/live + /ready) and metrics server
//! 8. Spawn the directory refresher (public view every 60s)
//! 9. Wait for SIGINT → broadcast shutdown → exit

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::{broadcast, watch};
use tracing::{error, info};

use albury_directory::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use albury_directory::adapters::persistence;
use albury_directory::config;
use albury_directory::domain::tier::Tier;
use albury_directory::ports::clock::{Clock, SystemClock};
use albury_directory::usecases::{DirectoryServices, DirectorySnapshot};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path =
        std::env::var("DIRECTORY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.directory.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.directory.name,
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.storage.backend,
        "Starting directory"
    );

    for tier in Tier::ALL {
        let info = tier.info();
        info!(
            tier = %tier,
            price = %info.price_label(),
            duration = info.duration_label,
            requires_password = info.requires_password,
            "Tier available"
        );
    }

    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    // ── 3. Storage backend ──────────────────────────────────
    let storage = persistence::open(&config.storage)
        .await
        .context("Failed to open storage backend")?;

    // ── 4. Stores and workflows ─────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    let services = DirectoryServices::new(Arc::clone(&storage), clock, &config)
        .with_metrics(Arc::clone(&metrics));

    // ── 5. First-run seeding ────────────────────────────────
    let passwords = services
        .access
        .list()
        .await
        .context("Failed to load tier passwords")?;
    info!(count = passwords.len(), "Tier passwords loaded");

    // ── 6. Front-end handle ─────────────────────────────────
    // `services` lives until shutdown; a presentation layer borrows it.
    info!(
        listings_key = %config.storage.listings_key,
        passwords_key = %config.storage.passwords_key,
        "Directory services ready"
    );

    // ── 7. Health + metrics servers ─────────────────────────
    let health = Arc::new(HealthState::new());
    health.set_storage_healthy(storage.is_healthy().await);

    let health_server = HealthServer::new(Arc::clone(&health), config.metrics.health_port);
    let health_shutdown = shutdown_tx.subscribe();
    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.run(health_shutdown).await {
            error!(error = %e, "Health server failed");
        }
    });

    let metrics_handle = if config.metrics.enabled {
        let metrics_shutdown = shutdown_tx.subscribe();
        let bind_address = config.metrics.bind_address.clone();
        let metrics_ref = Arc::clone(&metrics);
        Some(tokio::spawn(async move {
            if let Err(e) = metrics_ref.serve(bind_address, metrics_shutdown).await {
                error!(error = %e, "Metrics server failed");
            }
        }))
    } else {
        None
    };

    // ── 8. Directory refresher ──────────────────────────────
    let (refresher, snapshot_rx) = services.refresher(&config.refresh);
    let refresher = refresher
        .with_metrics(Arc::clone(&metrics))
        .with_health(Arc::clone(&health));
    let refresher_shutdown = shutdown_tx.subscribe();
    let refresher_handle = tokio::spawn(async move {
        if let Err(e) = refresher.run(refresher_shutdown).await {
            error!(error = %e, "Directory refresher failed");
        }
    });

    let watcher_handle = tokio::spawn(log_snapshots(snapshot_rx, shutdown_tx.subscribe()));

    info!("All tasks spawned, directory is running");

    // ── 9. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    let _ = shutdown_tx.send(());
    health.set_storage_healthy(false);

    let _ = tokio::time::timeout(Duration::from_secs(5), refresher_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), watcher_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), health_handle).await;
    if let Some(handle) = metrics_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    drop(services);
    info!("Shutdown complete");
    Ok(())
}

/// Log every published snapshot of the public view.
async fn log_snapshots(
    mut snapshot_rx: watch::Receiver<DirectorySnapshot>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => return,
            changed = snapshot_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                let snapshot = snapshot_rx.borrow_and_update().clone();
                info!(
                    visible = snapshot.listings.len(),
                    pending = snapshot.pending,
                    expired = snapshot.expired,
                    "Public directory refreshed"
                );
            }
        }
    }
}
