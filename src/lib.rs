//! IAR Platform price feed
//!
//! Scrapes currency and bullion quotes from the IAR Platform home page and
//! keeps the latest snapshot for the HTTP API.

pub mod core;
pub mod engine;
pub mod infrastructure;
pub mod parsing;
pub mod rest;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use crate::core::{FeedStatus, InstrumentKey, Quote, Snapshot, SnapshotStore};
pub use engine::{AppEngine, CycleReport};
pub use infrastructure::config::{ApiConfig, Config, LoggingConfig, SchedulerConfig, SourceConfig};

use thiserror::Error;

/// Main error type for the price feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] rest::FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] parsing::ExtractError),

    #[error("Configuration error: {0}")]
    Config(#[from] infrastructure::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FeedError>;
