//! Core types shared by the extraction engine and the API
//!
//! - InstrumentKey: the six fixed instruments
//! - Quote: buy/sell/change triple
//! - Snapshot: latest quotes plus status and update time
//! - SnapshotStore: single-writer, many-reader holder of the Snapshot

pub mod market_data;
pub mod store;

pub use market_data::{FeedStatus, InstrumentKey, Quote, Snapshot};
pub use store::SnapshotStore;
