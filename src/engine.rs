//! Extraction Engine
//!
//! Runs the fetch -> parse -> classify -> store cycle and drives it on a
//! fixed schedule. Every failure is absorbed here: it becomes a status on
//! the snapshot and a log line, never an error for the caller.
//!
//! Extraction runs on the blocking pool; a panic there ends the cycle with
//! `FeedStatus::Error` instead of taking the process down.

use crate::core::{FeedStatus, SnapshotStore};
use crate::infrastructure::clock;
use crate::infrastructure::metrics::MetricsCollector;
use crate::parsing::{self, ExtractError, PageExtraction};
use crate::rest::PageFetcher;
use crate::{log_scrape, log_main};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::Level;

/// Page text to table classification or fallback diagnostics
pub type Extractor = fn(&str) -> Result<PageExtraction, ExtractError>;

/// Outcome of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub status: FeedStatus,
    /// Distinct instruments written to the snapshot
    pub written: usize,
    pub elapsed: Duration,
}

/// Single writer of the shared snapshot
pub struct AppEngine<F: PageFetcher> {
    fetcher: F,
    store: Arc<SnapshotStore>,
    metrics: Arc<MetricsCollector>,
    extract: Extractor,
    /// Serializes scheduled and manually triggered cycles
    cycle_lock: Mutex<()>,
}

impl<F: PageFetcher> AppEngine<F> {
    pub fn new(fetcher: F, store: Arc<SnapshotStore>, metrics: Arc<MetricsCollector>) -> Self {
        Self {
            fetcher,
            store,
            metrics,
            extract: parsing::extract_page,
            cycle_lock: Mutex::new(()),
        }
    }

    /// Replace the extraction step (defaults to `parsing::extract_page`)
    pub fn with_extractor(mut self, extract: Extractor) -> Self {
        self.extract = extract;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn store(&self) -> Arc<SnapshotStore> {
        self.store.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Run one complete cycle and record its outcome.
    ///
    /// Waits for any cycle already in progress.
    pub async fn run_cycle(&self) -> CycleReport {
        let _guard = self.cycle_lock.lock().await;
        let started = Instant::now();

        let (status, written) = self.execute().await;

        let elapsed = started.elapsed();
        self.metrics.record_cycle(status, elapsed);
        log_scrape!(
            Level::DEBUG,
            "Cycle finished: status={} written={} in {:?}",
            status,
            written,
            elapsed
        );

        CycleReport {
            status,
            written,
            elapsed,
        }
    }

    async fn execute(&self) -> (FeedStatus, usize) {
        log_scrape!(Level::INFO, "Fetching market data...");

        let page = match self.fetcher.fetch().await {
            Ok(page) => page,
            Err(e) => {
                log_scrape!(Level::ERROR, "Request error: {}", e);
                self.store.set_status(FeedStatus::ConnectionError);
                return (FeedStatus::ConnectionError, 0);
            }
        };

        let extract = self.extract;
        let html = page.text();
        let extraction = match tokio::task::spawn_blocking(move || extract(&html)).await {
            Ok(extraction) => extraction,
            Err(e) => {
                log_scrape!(Level::ERROR, "Extraction aborted: {}", e);
                self.store.set_status(FeedStatus::Error);
                return (FeedStatus::Error, 0);
            }
        };

        match extraction {
            Ok(PageExtraction::Table(classification)) => {
                if classification.faults > 0 {
                    log_scrape!(
                        Level::WARN,
                        "Skipped {} faulty rows of {}",
                        classification.faults,
                        classification.rows
                    );
                }

                let last_update = clock::time_of_day(clock::now());
                let written = self.store.publish(classification.quotes, last_update);
                if written > 0 {
                    log_scrape!(
                        Level::INFO,
                        "Data updated successfully: {}",
                        self.store.last_update()
                    );
                    (FeedStatus::Success, written)
                } else {
                    log_scrape!(Level::WARN, "No data found in market table");
                    (FeedStatus::NoDataFound, 0)
                }
            }
            Ok(PageExtraction::NoTable(report)) => {
                log_scrape!(
                    Level::WARN,
                    "Market table not found ({} script blocks, {} candidates)",
                    report.script_blocks,
                    report.candidates.len()
                );
                self.store.set_status(FeedStatus::NoTableFound);
                (FeedStatus::NoTableFound, 0)
            }
            Err(e) => {
                log_scrape!(Level::ERROR, "General error: {}", e);
                self.store.set_status(FeedStatus::Error);
                (FeedStatus::Error, 0)
            }
        }
    }
}

impl<F: PageFetcher + 'static> AppEngine<F> {
    /// Run a cycle every `period`, starting immediately. Never returns.
    pub async fn run(self: Arc<Self>, period: Duration) {
        log_main!(Level::INFO, "Scheduler started, interval {:?}", period);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let report = self.run_cycle().await;
            if report.status.is_failure() {
                log_main!(
                    Level::WARN,
                    "Cycle ended with {}, next attempt in {:?}",
                    report.status,
                    period
                );
            }
        }
    }

    /// Spawn the schedule; the caller owns the handle and its lifetime
    pub fn spawn_scheduler(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(self.clone().run(period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InstrumentKey, Quote};
    use crate::rest::FetchError;
    use crate::test_utils::{market_page, no_table_page, unknown_rows_page, updated_market_page, StubFetcher};

    fn engine(fetcher: StubFetcher) -> AppEngine<StubFetcher> {
        AppEngine::new(
            fetcher,
            Arc::new(SnapshotStore::new()),
            Arc::new(MetricsCollector::new()),
        )
    }

    #[tokio::test]
    async fn test_successful_cycle() {
        let engine = engine(StubFetcher::page(market_page()));

        let report = engine.run_cycle().await;
        assert_eq!(report.status, FeedStatus::Success);
        assert_eq!(report.written, 6);

        let snapshot = engine.store().snapshot();
        assert_eq!(snapshot.status, FeedStatus::Success);
        assert!(!snapshot.last_update.is_empty());
        assert_eq!(snapshot.quote(InstrumentKey::UsdTry), Quote::new(32.5, 32.8, 0.0));
        assert_eq!(snapshot.quote(InstrumentKey::Ata), Quote::new(15800.0, 16200.0, 1.1));
        assert_eq!(snapshot.data_points(), 6);
    }

    #[tokio::test]
    async fn test_cycle_is_idempotent() {
        let engine = engine(StubFetcher::page(market_page()));

        engine.run_cycle().await;
        let first = engine.store().snapshot();
        engine.run_cycle().await;
        let second = engine.store().snapshot();

        assert_eq!(second.status, first.status);
        assert_eq!(
            first.quotes().collect::<Vec<_>>(),
            second.quotes().collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_connection_error_keeps_quotes() {
        let fetcher = StubFetcher::page(market_page());
        let engine = engine(fetcher);
        engine.run_cycle().await;
        let before = engine.store().snapshot();

        engine.fetcher.set_error(FetchError::Network("connection refused".to_string()));
        let report = engine.run_cycle().await;

        assert_eq!(report.status, FeedStatus::ConnectionError);
        let after = engine.store().snapshot();
        assert_eq!(after.status, FeedStatus::ConnectionError);
        assert_eq!(after.last_update, before.last_update);
        assert_eq!(
            after.quotes().collect::<Vec<_>>(),
            before.quotes().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_http_status_is_connection_error() {
        let engine = engine(StubFetcher::failing(FetchError::Http(503)));
        let report = tokio_test::block_on(engine.run_cycle());
        assert_eq!(report.status, FeedStatus::ConnectionError);
        assert!(engine.store().last_update().is_empty());
    }

    #[tokio::test]
    async fn test_no_table_found() {
        let engine = engine(StubFetcher::page(no_table_page()));
        let report = engine.run_cycle().await;

        assert_eq!(report.status, FeedStatus::NoTableFound);
        let snapshot = engine.store().snapshot();
        assert_eq!(snapshot.status, FeedStatus::NoTableFound);
        // fallback findings never reach the snapshot
        assert_eq!(snapshot.data_points(), 0);
        assert!(snapshot.last_update.is_empty());
    }

    #[tokio::test]
    async fn test_no_data_found() {
        let engine = engine(StubFetcher::page(unknown_rows_page()));
        let report = engine.run_cycle().await;
        assert_eq!(report.status, FeedStatus::NoDataFound);
        assert_eq!(engine.store().status(), FeedStatus::NoDataFound);
    }

    #[tokio::test]
    async fn test_partial_update_overwrites_only_matched() {
        let engine = engine(StubFetcher::page(market_page()));
        engine.run_cycle().await;

        engine.fetcher.set_page(updated_market_page());
        let report = engine.run_cycle().await;
        assert_eq!(report.written, 2);

        let snapshot = engine.store().snapshot();
        assert_eq!(snapshot.quote(InstrumentKey::UsdTry), Quote::new(32.7, 33.0, 0.2));
        assert_eq!(snapshot.quote(InstrumentKey::GoldOns), Quote::new(2345.1, 2347.9, 0.45));
    }

    fn panicking_extractor(_html: &str) -> Result<PageExtraction, ExtractError> {
        panic!("malformed document");
    }

    fn failing_extractor(_html: &str) -> Result<PageExtraction, ExtractError> {
        Err(ExtractError::Pattern("unclosed group".to_string()))
    }

    #[tokio::test]
    async fn test_extraction_panic_sets_error() {
        let engine = engine(StubFetcher::page(market_page()));
        engine.run_cycle().await;
        let before = engine.store().snapshot();

        let engine = engine.with_extractor(panicking_extractor);
        let report = engine.run_cycle().await;
        assert_eq!(report.status, FeedStatus::Error);

        let after = engine.store().snapshot();
        assert_eq!(after.status, FeedStatus::Error);
        assert_eq!(after.last_update, before.last_update);
        assert_eq!(after.quote(InstrumentKey::UsdTry), Quote::new(32.5, 32.8, 0.0));

        // the next cycle recovers
        let engine = engine.with_extractor(parsing::extract_page);
        assert_eq!(engine.run_cycle().await.status, FeedStatus::Success);
        assert_eq!(engine.metrics().snapshot().errors, 1);
    }

    #[tokio::test]
    async fn test_extraction_error_sets_error() {
        let engine = engine(StubFetcher::page(market_page())).with_extractor(failing_extractor);
        let report = engine.run_cycle().await;

        assert_eq!(report.status, FeedStatus::Error);
        assert_eq!(engine.store().status(), FeedStatus::Error);
        assert_eq!(engine.store().snapshot().data_points(), 0);
    }

    #[tokio::test]
    async fn test_metrics_recorded() {
        let engine = engine(StubFetcher::page(market_page()));
        engine.run_cycle().await;
        engine.fetcher.set_error(FetchError::Http(500));
        engine.run_cycle().await;

        let metrics = engine.metrics().snapshot();
        assert_eq!(metrics.cycles, 2);
        assert_eq!(metrics.successes, 1);
        assert_eq!(metrics.connection_errors, 1);
    }

    #[tokio::test]
    async fn test_scheduler_runs_repeatedly() {
        let engine = Arc::new(engine(StubFetcher::page(market_page())));

        let handle = engine.spawn_scheduler(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.abort();

        assert!(engine.fetcher.calls() >= 2);
        assert_eq!(engine.store().status(), FeedStatus::Success);
    }
}
