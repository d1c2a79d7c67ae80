//! Metrics Adapters - Prometheus Export and Health Probes
//!
//! Provides Prometheus metrics export and health check endpoints
//! (/live, /ready) via axum.

pub mod health;
pub mod prometheus;

pub use health::{HealthServer, HealthState};
pub use prometheus::MetricsRegistry;
