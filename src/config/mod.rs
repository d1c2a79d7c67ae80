//! Configuration Module - TOML-based Directory Configuration
//!
//! Loads and validates configuration from `config.toml`. Storage keys,
//! the admin secret and refresh cadence are externalized here; the tier
//! table is a fixed business rule and lives in the domain layer.

pub mod loader;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Site identity and logging.
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Admin console access.
    pub admin: AdminConfig,
    /// Collection storage backend.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Public view refresh.
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Metrics and health endpoints.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Site identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Human-readable directory name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Admin console configuration.
#[derive(Clone, Deserialize)]
pub struct AdminConfig {
    /// Shared plaintext secret unlocking the admin console.
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which `KeyValueStore` adapter to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per collection under `data_dir`.
    #[default]
    File,
    /// Process memory only.
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for collection files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Key of the listings collection.
    #[serde(default = "default_listings_key")]
    pub listings_key: String,
    /// Key of the tier password collection.
    #[serde(default = "default_passwords_key")]
    pub passwords_key: String,
}

/// Refresh configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between public view rebuilds. Drives free-tier expiry.
    #[serde(default = "default_refresh_interval")]
    pub interval_seconds: u64,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics export.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Metrics server bind address.
    #[serde(default = "default_metrics_addr")]
    pub bind_address: String,
    /// Health check endpoint port.
    #[serde(default = "default_health_port")]
    pub health_port: u16,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            listings_key: default_listings_key(),
            passwords_key: default_passwords_key(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_refresh_interval(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            bind_address: default_metrics_addr(),
            health_port: default_health_port(),
        }
    }
}

// Default value functions for serde

fn default_name() -> String {
    "Albury Business Directory".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_listings_key() -> String {
    "albury_listings".to_string()
}

fn default_passwords_key() -> String {
    "albury_passwords".to_string()
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

fn default_health_port() -> u16 {
    8080
}
