//! Market data types
//!
//! InstrumentKey, Quote and Snapshot are the core structures published to
//! query callers. The instrument set is fixed at compile time.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One of the six instruments scraped from the market table.
///
/// Declaration order is the serialization order of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKey {
    UsdTry,
    EurTry,
    GoldOns,
    SilverKg,
    Quarter,
    Ata,
}

impl InstrumentKey {
    /// All instruments, in declaration order
    pub const ALL: [InstrumentKey; 6] = [
        Self::UsdTry,
        Self::EurTry,
        Self::GoldOns,
        Self::SilverKg,
        Self::Quarter,
        Self::Ata,
    ];

    /// Wire name used in JSON payloads
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UsdTry => "usd_try",
            Self::EurTry => "eur_try",
            Self::GoldOns => "gold_ons",
            Self::SilverKg => "silver_kg",
            Self::Quarter => "quarter",
            Self::Ata => "ata",
        }
    }

    /// Human-readable label for logs
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::UsdTry => "USD/TRY",
            Self::EurTry => "EUR/TRY",
            Self::GoldOns => "Altın ONS",
            Self::SilverKg => "Gümüş KG",
            Self::Quarter => "Eski Çeyrek",
            Self::Ata => "Eski Ata",
        }
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buy/sell/change triple for one instrument
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Quote {
    pub buy: f64,
    pub sell: f64,
    pub change: f64,
}

impl Quote {
    pub const ZERO: Quote = Quote {
        buy: 0.0,
        sell: 0.0,
        change: 0.0,
    };

    pub fn new(buy: f64, sell: f64, change: f64) -> Self {
        Self { buy, sell, change }
    }
}

/// Outcome label of the most recent extraction cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    #[default]
    Initializing,
    Success,
    NoTableFound,
    NoDataFound,
    ConnectionError,
    Error,
}

impl FeedStatus {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Success => "success",
            Self::NoTableFound => "no_table_found",
            Self::NoDataFound => "no_data_found",
            Self::ConnectionError => "connection_error",
            Self::Error => "error",
        }
    }

    /// Returns true for any status other than `Success` or `Initializing`
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Success | Self::Initializing)
    }
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known quote per instrument plus cycle status.
///
/// Every `InstrumentKey` is always present; quotes are only ever overwritten,
/// never removed. Serializes flat: one key per instrument, then
/// `last_update` and `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(flatten)]
    quotes: BTreeMap<InstrumentKey, Quote>,
    pub last_update: String,
    pub status: FeedStatus,
}

impl Snapshot {
    /// All-zero quotes, empty `last_update`, status `initializing`
    pub fn new() -> Self {
        Self {
            quotes: InstrumentKey::ALL
                .iter()
                .map(|key| (*key, Quote::ZERO))
                .collect(),
            last_update: String::new(),
            status: FeedStatus::Initializing,
        }
    }

    #[inline]
    pub fn quote(&self, key: InstrumentKey) -> Quote {
        self.quotes.get(&key).copied().unwrap_or_default()
    }

    #[inline]
    pub fn set_quote(&mut self, key: InstrumentKey, quote: Quote) {
        self.quotes.insert(key, quote);
    }

    pub fn quotes(&self) -> impl Iterator<Item = (InstrumentKey, Quote)> + '_ {
        self.quotes.iter().map(|(k, q)| (*k, *q))
    }

    /// Number of instruments with a non-zero buy price
    pub fn data_points(&self) -> usize {
        self.quotes.values().filter(|q| q.buy > 0.0).count()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}
