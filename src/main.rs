//! IAR Platform price feed server
//!
//! # Architecture
//! - **core**: Snapshot types and the shared store
//! - **parsing**: HTML extraction (table discovery, row rules, number normalization)
//! - **rest**: Source page fetcher
//! - **engine**: Extraction cycle and schedule
//! - **infrastructure**: Config, logging, metrics, API

use iar_price_feed::infrastructure::{logging, start_server, AppState, Config, MetricsCollector};
use iar_price_feed::rest::HttpPageFetcher;
use iar_price_feed::{AppEngine, Result, SnapshotStore};
use std::sync::Arc;
use std::time::Duration;

/// Main application
pub struct FeedApp {
    config: Config,
}

impl FeedApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        tracing::info!("Starting IAR Platform price feed...");

        // 1. Shared state
        let store = Arc::new(SnapshotStore::new());
        let metrics = Arc::new(MetricsCollector::new());

        // 2. Extraction engine
        let fetcher = HttpPageFetcher::new(&self.config.source)?;
        tracing::info!("Source page: {}", fetcher.url());
        let engine = Arc::new(AppEngine::new(fetcher, store, metrics));

        // 3. Schedule (first cycle runs immediately)
        let period = Duration::from_secs(self.config.scheduler.interval_secs);
        let scheduler = engine.spawn_scheduler(period);

        // 4. API Server (blocks until shutdown)
        let state = AppState::new(engine);
        let result = start_server(state, &self.config.api, shutdown_signal()).await;

        scheduler.abort();
        tracing::info!("Price feed stopped");
        result
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // Guards flush file appenders on drop
    let _guards = logging::init_logging(&config.logging)?;

    let app = FeedApp::new(config);
    app.run().await
}
