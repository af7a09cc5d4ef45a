//! Centralized file-based logging system
//!
//! Writes logs to files under the configured directory, separated by type:
//! - main/ - General application logs (JSON)
//! - error/ - Error and warning logs only
//! - scrape/ - Fetch, extraction and cycle logs
//! - api/ - API server logs
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

use super::config::LoggingConfig;

/// Per-type subdirectories created under the log root
pub const LOG_TYPES: [&str; 4] = ["main", "error", "scrape", "api"];

/// Initialize console and (optionally) rolling file logging
///
/// Returns the appender guards, which must be kept alive for the duration
/// of the program.
pub fn init_logging(config: &LoggingConfig) -> io::Result<Vec<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if !config.file_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer())
            .try_init()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        return Ok(Vec::new());
    }

    create_log_dirs(&config.dir)?;

    let mut guards = Vec::new();

    // Main log - all logs
    let (main_appender, main_guard) = create_appender(&config.dir, "main");
    guards.push(main_guard);

    // Error log - ERROR and WARN only
    let (error_appender, error_guard) = create_appender(&config.dir, "error");
    guards.push(error_guard);

    // Scrape log - fetch, parse and cycle logs
    let (scrape_appender, scrape_guard) = create_appender(&config.dir, "scrape");
    guards.push(scrape_guard);

    // API log - API server logs
    let (api_appender, api_guard) = create_appender(&config.dir, "api");
    guards.push(api_guard);

    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(main_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json();

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let scrape_layer = tracing_subscriber::fmt::layer()
        .with_writer(scrape_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            is_scrape_target(metadata.target())
        }));

    let api_layer = tracing_subscriber::fmt::layer()
        .with_writer(api_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            is_api_target(metadata.target())
        }));

    tracing_subscriber::registry()
        .with(filter)
        .with(main_layer)
        .with(error_layer)
        .with(scrape_layer)
        .with(api_layer)
        .with(console_layer())
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    tracing::info!(
        "Logging system initialized. Log files in {}",
        config.dir.display()
    );

    Ok(guards)
}

/// Human-readable stdout layer, built per subscriber stack
fn console_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
}

/// Create the log root and one subdirectory per log type
pub fn create_log_dirs(root: &Path) -> io::Result<()> {
    for log_type in LOG_TYPES {
        fs::create_dir_all(root.join(log_type))?;
    }
    Ok(())
}

fn is_scrape_target(target: &str) -> bool {
    target.contains("scrape") || target.contains("engine") || target.contains("rest")
}

fn is_api_target(target: &str) -> bool {
    target.contains("api") || target.contains("server")
}

/// Create a daily rolling file appender
fn create_appender(root: &Path, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, root.join(name), name);

    tracing_appender::non_blocking(appender)
}

/// Log macro helpers for specific log types
#[macro_export]
macro_rules! log_scrape {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "scrape", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_api {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "api", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_main {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "main", $level, $($arg)+)
    };
}
