//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;

    info!(
        name = %config.directory.name,
        backend = ?config.storage.backend,
        refresh_seconds = config.refresh.interval_seconds,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(content).context("Failed to parse config.toml")?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        !config.admin.password.is_empty(),
        "admin.password must not be empty"
    );

    let storage = &config.storage;
    anyhow::ensure!(
        !storage.listings_key.is_empty() && !storage.passwords_key.is_empty(),
        "storage keys must not be empty"
    );
    anyhow::ensure!(
        storage.listings_key != storage.passwords_key,
        "storage.listings_key and storage.passwords_key must differ, both are {:?}",
        storage.listings_key
    );
    anyhow::ensure!(
        !storage.data_dir.is_empty(),
        "storage.data_dir must not be empty"
    );

    anyhow::ensure!(
        config.refresh.interval_seconds > 0,
        "refresh.interval_seconds must be positive"
    );

    if config.metrics.enabled {
        anyhow::ensure!(
            !config.metrics.bind_address.is_empty(),
            "metrics.bind_address must not be empty"
        );
    }

    Ok(())
}
