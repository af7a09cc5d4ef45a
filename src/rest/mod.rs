//! HTTP client for the source page

pub mod client;

pub use client::{FetchError, HttpPageFetcher, PageFetcher, PageResponse};
