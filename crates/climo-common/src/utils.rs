//! Shared utility functions.

use chrono::{Datelike, NaiveDate};

/// Formats a value with one decimal place, never printing `-0.0`.
///
/// The exact binary value is rounded once; exact ties go to the even digit.
pub fn format_tenths(value: f64) -> String {
    let formatted = format!("{value:.1}");
    if formatted == "-0.0" {
        "0.0".to_string()
    } else {
        formatted
    }
}

/// Same month and day `years` earlier; Feb 29 maps to Feb 28 in common years.
pub fn years_before(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    let year = date.year().checked_sub(i32::try_from(years).ok()?)?;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), date.day() - 1))
}

/// Truncates a string to at most `max_chars` characters, ending with an ellipsis.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let kept: String = input.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}
