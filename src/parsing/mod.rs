//! HTML extraction pipeline
//!
//! Page text -> document -> market table -> classified rows.
//! Falls back to a diagnostic scan when no market table is found.
//!
//! `scraper::Html` is not `Send`; everything here is synchronous and must
//! not be held across an `.await`.

pub mod fallback;
pub mod numeric;
pub mod rows;
pub mod table;

pub use fallback::FallbackReport;
pub use numeric::normalize;
pub use rows::{classify_label, classify_row, classify_rows, Classification, RawRow, RowError, RowOutcome, RULES};
pub use table::{find_market_table, TABLE_KEYWORDS};

use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Unexpected extraction failures (anything other than "no table")
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid selector {selector}: {message}")]
    Selector { selector: &'static str, message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(String),
}

/// CSS selectors used by the pipeline
#[derive(Debug, Clone)]
pub struct Selectors {
    pub table: Selector,
    pub row: Selector,
    pub cell: Selector,
    pub script: Selector,
    pub classed: Selector,
}

impl Selectors {
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            table: compile("table")?,
            row: compile("tr")?,
            cell: compile("td, th")?,
            script: compile("script")?,
            classed: compile("[class]")?,
        })
    }
}

/// Selectors compiled on first use and shared by every cycle
pub fn selectors() -> Result<&'static Selectors, ExtractError> {
    static SELECTORS: OnceLock<Result<Selectors, ExtractError>> = OnceLock::new();
    SELECTORS.get_or_init(Selectors::new).as_ref().map_err(Clone::clone)
}

fn compile(selector: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector,
        message: e.to_string(),
    })
}

/// Result of running the pipeline over one page
#[derive(Debug, Clone, PartialEq)]
pub enum PageExtraction {
    /// A market table was found and its rows classified
    Table(Classification),
    /// No market table; only diagnostics are available
    NoTable(FallbackReport),
}

/// Run table discovery and row classification over raw page text
pub fn extract_page(html: &str) -> Result<PageExtraction, ExtractError> {
    let selectors = selectors()?;
    let document = Html::parse_document(html);

    match find_market_table(&document, selectors) {
        Some(table) => Ok(PageExtraction::Table(rows::classify_table(table, selectors))),
        None => Ok(PageExtraction::NoTable(fallback::scan(&document, selectors)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InstrumentKey, Quote};
    use crate::test_utils::{market_page, no_table_page};

    #[test]
    fn test_selectors_compile() {
        assert!(Selectors::new().is_ok());
    }

    #[test]
    fn test_selectors_shared() {
        let first = selectors().unwrap();
        let second = selectors().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_extract_market_page() {
        let extraction = extract_page(market_page()).unwrap();
        let PageExtraction::Table(classification) = extraction else {
            panic!("Expected a market table");
        };

        assert_eq!(classification.faults, 0);
        let keys: Vec<InstrumentKey> = classification.quotes.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, InstrumentKey::ALL.to_vec());
        assert_eq!(
            classification.quotes[0],
            (InstrumentKey::UsdTry, Quote::new(32.5, 32.8, 0.0))
        );
    }

    #[test]
    fn test_extract_without_tables_uses_fallback() {
        let extraction = extract_page(no_table_page()).unwrap();
        let PageExtraction::NoTable(report) = extraction else {
            panic!("Expected fallback");
        };
        assert_eq!(report.script_blocks, 1);
        assert_eq!(report.candidates.len(), 1);
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(matches!(extract_page(""), Ok(PageExtraction::NoTable(_))));
    }
}
