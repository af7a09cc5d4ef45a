//! API Server (query facade)
//!
//! Read-only view of the latest snapshot plus a manual cycle trigger.
//! Handlers always answer with the last good data and the current status
//! label, even after a failed cycle.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::Level;

use crate::core::{FeedStatus, Snapshot, SnapshotStore};
use crate::engine::AppEngine;
use crate::infrastructure::clock;
use crate::infrastructure::config::ApiConfig;
use crate::infrastructure::metrics::{MetricsCollector, MetricsSnapshot};
use crate::rest::PageFetcher;
use crate::{log_api, FeedError};

pub const SERVER_NAME: &str = "IAR Platform API Server";

/// Response for `GET /`
#[derive(Debug, Serialize)]
pub struct IndexDto {
    pub message: &'static str,
    pub version: &'static str,
    pub status: FeedStatus,
    pub last_update: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Response for `GET /api/status`
#[derive(Debug, Serialize)]
pub struct StatusDto {
    pub status: FeedStatus,
    pub last_update: String,
    pub server_time: String,
    pub uptime: &'static str,
    pub data_points: usize,
    pub cycles: MetricsSnapshot,
}

/// Response for `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub timestamp: String,
}

/// Response for `GET /api/test`
#[derive(Debug, Serialize)]
pub struct TestRunDto {
    pub message: &'static str,
    pub data: Snapshot,
}

/// Shared application state
pub struct AppState<F: PageFetcher> {
    pub store: Arc<SnapshotStore>,
    pub metrics: Arc<MetricsCollector>,
    pub engine: Arc<AppEngine<F>>,
}

// Manual impl: deriving would require `F: Clone`
impl<F: PageFetcher> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            metrics: self.metrics.clone(),
            engine: self.engine.clone(),
        }
    }
}

impl<F: PageFetcher> AppState<F> {
    pub fn new(engine: Arc<AppEngine<F>>) -> Self {
        Self {
            store: engine.store(),
            metrics: engine.metrics(),
            engine,
        }
    }
}

/// Build the router with all endpoints and permissive CORS
pub fn router<F: PageFetcher + 'static>(state: AppState<F>) -> Router {
    Router::new()
        .route("/", get(index::<F>))
        .route("/api/prices", get(get_prices::<F>))
        .route("/api/status", get(get_status::<F>))
        .route("/api/health", get(health_check))
        .route("/api/test", get(trigger_cycle::<F>))
        // The feed is consumed by static pages on other origins
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server; returns when `shutdown` resolves
pub async fn start_server<F, S>(
    state: AppState<F>,
    config: &ApiConfig,
    shutdown: S,
) -> Result<(), FeedError>
where
    F: PageFetcher + 'static,
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    log_api!(Level::INFO, "API Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    log_api!(Level::INFO, "API Server stopped");
    Ok(())
}

/// Handler for /
async fn index<F: PageFetcher>(State(state): State<AppState<F>>) -> Json<IndexDto> {
    let snapshot = state.store.snapshot();
    let endpoints = BTreeMap::from([
        ("/api/prices", "Current price data"),
        ("/api/status", "Server status"),
        ("/api/health", "Health check"),
        ("/api/test", "Run one scrape now and return the result"),
    ]);

    Json(IndexDto {
        message: SERVER_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: snapshot.status,
        last_update: snapshot.last_update,
        endpoints,
    })
}

/// Handler for /api/prices
async fn get_prices<F: PageFetcher>(State(state): State<AppState<F>>) -> Json<Snapshot> {
    Json(state.store.snapshot())
}

/// Handler for /api/status
async fn get_status<F: PageFetcher>(State(state): State<AppState<F>>) -> Json<StatusDto> {
    let snapshot = state.store.snapshot();

    Json(StatusDto {
        status: snapshot.status,
        data_points: snapshot.data_points(),
        last_update: snapshot.last_update,
        server_time: clock::date_time(clock::now()),
        uptime: "running",
        cycles: state.metrics.snapshot(),
    })
}

/// Handler for /api/health
async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "healthy",
        timestamp: clock::rfc3339(clock::now()),
    })
}

/// Handler for /api/test
/// Runs one cycle outside the schedule, then returns the snapshot
async fn trigger_cycle<F: PageFetcher>(State(state): State<AppState<F>>) -> Json<TestRunDto> {
    let report = state.engine.run_cycle().await;
    log_api!(Level::INFO, "Manual cycle finished with status {}", report.status);

    Json(TestRunDto {
        message: "Test scraping completed",
        data: state.store.snapshot(),
    })
}
