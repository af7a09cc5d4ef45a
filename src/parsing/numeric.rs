//! Locale-tolerant price normalization
//!
//! Handles both Turkish (`1.234,56`) and Anglo (`1,234.56`) formatting.
//! Anything unparseable becomes 0.0; this never fails.

/// Convert a decorated price string into a finite `f64`.
///
/// Only digits, `.` and `,` survive. When both separators appear the later
/// one is the decimal point and the other is dropped. A lone `,` is a
/// decimal point. Empty, unparseable or non-finite input yields `0.0`.
pub fn normalize(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    let canonical = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    match canonical.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
