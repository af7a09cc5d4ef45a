//! Configuration management for the price feed
//!
//! Loads configuration from config.toml at startup (path from `CONFIG_PATH`).
//! A missing file means defaults. `PORT` overrides the API port.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Feed configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Source page settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Cycle schedule
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// API server settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how the market page is fetched
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Transport-level request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Seconds between extraction cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,

    /// Port for HTTP API server
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Root directory for rolling log files
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    /// Write rolling files in addition to the console
    #[serde(default = "default_file_output")]
    pub file_output: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            file_output: default_file_output(),
        }
    }
}

fn default_source_url() -> String {
    "https://www.iarplatform.com".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "tr-TR,tr;q=0.9,en;q=0.8".to_string()
}

fn default_interval_secs() -> u64 {
    30
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_file_output() -> bool {
    true
}

impl Config {
    /// Load configuration from config.toml and the environment
    ///
    /// If the file doesn't exist, returns default configuration.
    /// # Errors
    /// Returns error if the file exists but cannot be parsed, if `PORT` is
    /// not a valid port, or if validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml(&contents)?,
            // File not found - use defaults
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(ConfigError::IoError(e)),
        };

        if let Ok(port) = std::env::var("PORT") {
            config.apply_port(&port)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text; absent sections and keys take defaults
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Override the API port from a raw environment value
    pub fn apply_port(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.api.port = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("PORT must be a port number, got {:?}", raw)))?;
        Ok(())
    }

    /// Reject settings the feed cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.source.url)
            .map_err(|e| ConfigError::Invalid(format!("source.url {:?}: {}", self.source.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "source.url must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.scheduler.interval_secs == 0 {
            return Err(ConfigError::Invalid("scheduler.interval_secs must be > 0".to_string()));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Parse error (invalid TOML)
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Semantically invalid value
    #[error("Invalid config: {0}")]
    Invalid(String),
}
