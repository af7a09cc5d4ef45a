//! Shared snapshot store
//!
//! Single writer (the extraction engine), any number of readers (the API).
//! Readers get an owned copy so a request never holds the lock while
//! serializing.

use super::{FeedStatus, InstrumentKey, Quote, Snapshot};
use parking_lot::RwLock;

/// Process-wide holder of the latest `Snapshot`
#[derive(Debug, Default)]
pub struct SnapshotStore {
    inner: RwLock<Snapshot>,
}

impl SnapshotStore {
    /// Create store with all-zero quotes and status `initializing`
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Snapshot::new()),
        }
    }

    /// Owned copy of the current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().clone()
    }

    #[inline]
    pub fn status(&self) -> FeedStatus {
        self.inner.read().status
    }

    pub fn last_update(&self) -> String {
        self.inner.read().last_update.clone()
    }

    /// Record a failed or empty cycle. Quotes and `last_update` are untouched.
    pub fn set_status(&self, status: FeedStatus) {
        self.inner.write().status = status;
    }

    /// Write one cycle's matched quotes, then mark it successful.
    ///
    /// Later entries for the same key win. Returns the number of distinct
    /// instruments written; with zero entries the status becomes
    /// `no_data_found` and nothing else changes.
    pub fn publish<I>(&self, quotes: I, last_update: String) -> usize
    where
        I: IntoIterator<Item = (InstrumentKey, Quote)>,
    {
        let mut snapshot = self.inner.write();
        let mut written = [false; InstrumentKey::ALL.len()];

        for (key, quote) in quotes {
            snapshot.set_quote(key, quote);
            written[key as usize] = true;
        }

        let count = written.iter().filter(|w| **w).count();
        if count > 0 {
            snapshot.last_update = last_update;
            snapshot.status = FeedStatus::Success;
        } else {
            snapshot.status = FeedStatus::NoDataFound;
        }
        count
    }
}
