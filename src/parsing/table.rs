//! Market table discovery
//!
//! Picks the first `<table>` whose visible text mentions a market keyword.

use scraper::{ElementRef, Html};

use super::Selectors;

/// Upper-case keywords that mark a table as holding market data
pub const TABLE_KEYWORDS: [&str; 5] = ["USD", "EUR", "ALTIN", "GÜMÜŞ", "ÇEYREK"];

/// Find the table most likely to hold market quotes.
///
/// Returns `None` when the document has no tables or none of them mention a
/// keyword; callers fall back to the degraded scan in that case.
pub fn find_market_table<'a>(document: &'a Html, selectors: &Selectors) -> Option<ElementRef<'a>> {
    let mut seen = 0usize;
    let found = document.select(&selectors.table).find(|table| {
        seen += 1;
        is_market_table(table)
    });

    if found.is_none() {
        tracing::debug!(target: "scrape", "No market table among {} tables", seen);
    }
    found
}

fn is_market_table(table: &ElementRef<'_>) -> bool {
    let text = table.text().collect::<String>().to_uppercase();
    TABLE_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}
