//! Infrastructure
//!
//! Everything around the extraction pipeline:
//! - Configuration management
//! - Logging and metrics
//! - Wall-clock formatting
//! - API server

pub mod api;
pub mod clock;
pub mod config;
pub mod logging;
pub mod metrics;

pub use api::{start_server, AppState};
pub use config::Config;
pub use metrics::MetricsCollector;
