//! Page fetcher (transport)
//!
//! Fetches the source page with browser-like headers. Any transport failure
//! or non-2xx status is a `FetchError`; retries are left to the next cycle.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use std::future::Future;
use std::time::Duration;

use crate::infrastructure::config::SourceConfig;

/// Raw page as received
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    pub body: Bytes,
}

impl PageResponse {
    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Body read error: {0}")]
    Body(String),
}

/// Source of raw page content
///
/// The returned future must be `Send` so cycles can run on spawned tasks.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<PageResponse, FetchError>> + Send;
}

/// reqwest-backed fetcher for the configured source URL
pub struct HttpPageFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpPageFetcher {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|e| FetchError::Network(e.to_string()))?,
        );
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self) -> Result<PageResponse, FetchError> {
        tracing::info!(target: "scrape", "Fetching page from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        tracing::debug!(target: "scrape", "Received {} bytes", body.len());

        Ok(PageResponse {
            status: status.as_u16(),
            body,
        })
    }
}
