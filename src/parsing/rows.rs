//! Row classification
//!
//! Turns table rows into `(InstrumentKey, Quote)` pairs. Label matching is a
//! data-driven rule table evaluated top to bottom; the first rule that
//! matches wins. A faulty row is logged and skipped, never fatal.

use scraper::ElementRef;

use super::{normalize, Selectors};
use crate::core::{InstrumentKey, Quote};

/// Minimum number of cells for a row to carry a quote
pub const MIN_CELLS: usize = 3;

/// Substring-conjunction rule: every `all_of` term and, when non-empty, at
/// least one `any_of` term must appear in the upper-cased label.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub key: InstrumentKey,
    pub all_of: &'static [&'static str],
    pub any_of: &'static [&'static str],
}

impl ClassificationRule {
    pub fn matches(&self, label: &str) -> bool {
        self.all_of.iter().all(|term| label.contains(term))
            && (self.any_of.is_empty() || self.any_of.iter().any(|term| label.contains(term)))
    }
}

/// Label rules in priority order
pub const RULES: [ClassificationRule; 6] = [
    ClassificationRule {
        key: InstrumentKey::UsdTry,
        all_of: &["USD"],
        any_of: &["TRY", "TL"],
    },
    ClassificationRule {
        key: InstrumentKey::EurTry,
        all_of: &["EUR"],
        any_of: &["TRY", "TL"],
    },
    ClassificationRule {
        key: InstrumentKey::GoldOns,
        all_of: &["ALTIN", "ONS"],
        any_of: &[],
    },
    ClassificationRule {
        key: InstrumentKey::SilverKg,
        all_of: &["GÜMÜŞ", "KG"],
        any_of: &[],
    },
    ClassificationRule {
        key: InstrumentKey::Quarter,
        all_of: &["ÇEYREK", "ESKİ"],
        any_of: &[],
    },
    ClassificationRule {
        key: InstrumentKey::Ata,
        all_of: &["ATA", "ESKİ"],
        any_of: &[],
    },
];

/// Map an upper-cased product label to an instrument
pub fn classify_label(label: &str) -> Option<InstrumentKey> {
    RULES.iter().find(|rule| rule.matches(label)).map(|rule| rule.key)
}

/// Per-row faults
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("cell {0} missing")]
    MissingCell(usize),
}

/// One table row: trimmed cell texts in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Collect `td`/`th` text of a `<tr>`, each text node trimmed and joined
    pub fn from_element(row: ElementRef<'_>, selectors: &Selectors) -> Self {
        Self {
            cells: row
                .select(&selectors.cell)
                .map(|cell| cell.text().map(str::trim).collect::<String>())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Checked cell access
    pub fn cell(&self, index: usize) -> Result<&str, RowError> {
        self.cells
            .get(index)
            .map(|text| text.trim())
            .ok_or(RowError::MissingCell(index))
    }

    /// Upper-cased product label from cell 0
    pub fn label(&self) -> Result<String, RowError> {
        Ok(self.cell(0)?.to_uppercase())
    }
}

/// Result of classifying a single row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Matched(InstrumentKey, Quote),
    /// Label matched no rule
    Unmatched(String),
    /// Fewer than `MIN_CELLS` cells
    TooShort,
}

/// Classify one row.
///
/// Cell 1 and 2 are buy and sell; cell 3, when present and not `-`, is the
/// change.
pub fn classify_row(row: &RawRow) -> Result<RowOutcome, RowError> {
    if row.len() < MIN_CELLS {
        return Ok(RowOutcome::TooShort);
    }

    let label = row.label()?;
    let buy = normalize(row.cell(1)?);
    let sell = normalize(row.cell(2)?);
    let change = if row.len() > MIN_CELLS {
        match row.cell(3)? {
            "" | "-" => 0.0,
            text => normalize(text),
        }
    } else {
        0.0
    };

    Ok(match classify_label(&label) {
        Some(key) => RowOutcome::Matched(key, Quote::new(buy, sell, change)),
        None => RowOutcome::Unmatched(label),
    })
}

/// Aggregate of one table's classification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Matched pairs in row order; later entries win for the same key
    pub quotes: Vec<(InstrumentKey, Quote)>,
    pub rows: usize,
    pub unmatched: usize,
    pub faults: usize,
}

impl Classification {
    fn absorb(mut self, index: usize, outcome: Result<RowOutcome, RowError>) -> Self {
        self.rows += 1;
        match outcome {
            Ok(RowOutcome::Matched(key, quote)) => {
                tracing::info!(
                    target: "scrape",
                    "{}: {} / {}",
                    key.display_name(),
                    quote.buy,
                    quote.sell
                );
                self.quotes.push((key, quote));
            }
            Ok(RowOutcome::Unmatched(label)) => {
                tracing::debug!(target: "scrape", "Row {} ignored: {}", index, label);
                self.unmatched += 1;
            }
            Ok(RowOutcome::TooShort) => {}
            Err(e) => {
                tracing::error!(target: "scrape", "Row {} parse error: {}", index, e);
                self.faults += 1;
            }
        }
        self
    }
}

/// Classify every row; faults are counted and skipped
pub fn classify_rows<I>(rows: I) -> Classification
where
    I: IntoIterator<Item = Result<RawRow, RowError>>,
{
    rows.into_iter()
        .enumerate()
        .fold(Classification::default(), |acc, (index, row)| {
            acc.absorb(index, row.and_then(|row| classify_row(&row)))
        })
}

/// Classify all `<tr>` rows of a located market table
pub fn classify_table(table: ElementRef<'_>, selectors: &Selectors) -> Classification {
    classify_rows(
        table
            .select(&selectors.row)
            .map(|row| Ok(RawRow::from_element(row, selectors))),
    )
}
