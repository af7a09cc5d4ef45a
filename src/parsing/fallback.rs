//! Degraded scan used when no market table exists
//!
//! Diagnostic only: findings are logged and returned for inspection but are
//! never written into the snapshot.

use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

use super::{ExtractError, Selectors, TABLE_KEYWORDS};

/// Class attribute pattern for price-like containers
pub const CLASS_PATTERN: &str = r"(?i)price|currency|gold|silver";

/// Upper bound on candidate texts kept in a report
const MAX_CANDIDATES: usize = 32;

/// What the fallback scan saw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackReport {
    /// Script blocks mentioning usd or eur
    pub script_blocks: usize,
    /// Elements whose class matched `CLASS_PATTERN`
    pub classed_elements: usize,
    /// Upper-cased text of classed elements naming an instrument and a number
    pub candidates: Vec<String>,
}

impl FallbackReport {
    pub fn is_empty(&self) -> bool {
        self.script_blocks == 0 && self.candidates.is_empty()
    }
}

fn class_pattern() -> Result<&'static Regex, ExtractError> {
    static PATTERN: OnceLock<Result<Regex, ExtractError>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(CLASS_PATTERN).map_err(|e| ExtractError::Pattern(e.to_string())))
        .as_ref()
        .map_err(Clone::clone)
}

/// Best-effort scan of scripts and classed elements
pub fn scan(document: &Html, selectors: &Selectors) -> Result<FallbackReport, ExtractError> {
    let class_pattern = class_pattern()?;
    let mut report = FallbackReport::default();

    for script in document.select(&selectors.script) {
        let body = script.text().collect::<String>().to_lowercase();
        if body.contains("usd") || body.contains("eur") {
            report.script_blocks += 1;
        }
    }
    if report.script_blocks > 0 {
        tracing::info!(target: "scrape", "Found {} script blocks mentioning currencies", report.script_blocks);
    }

    let classed = document
        .select(&selectors.classed)
        .filter(|el| el.value().attr("class").is_some_and(|class| class_pattern.is_match(class)));

    for element in classed {
        report.classed_elements += 1;
        let text = element.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();

        let names_instrument = TABLE_KEYWORDS.iter().any(|keyword| text.contains(keyword));
        if names_instrument && text.chars().any(|c| c.is_ascii_digit()) {
            tracing::info!(target: "scrape", "Potential price data: {}", text);
            if report.candidates.len() < MAX_CANDIDATES {
                report.candidates.push(text);
            }
        }
    }

    Ok(report)
}
