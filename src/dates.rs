//! Conversion between the `D/M/YYYY` display form and the canonical
//! `YYYY-MM-DD` storage form.

use chrono::{Datelike, NaiveDate};

use crate::errors::{LedgerError, Result};

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

pub fn parse_display(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DISPLAY_FORMAT)
        .map_err(|err| LedgerError::InvalidDate(format!("`{}`: {}", value, err)))
}

pub fn parse_canonical(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), CANONICAL_FORMAT)
        .map_err(|err| LedgerError::InvalidDate(format!("`{}`: {}", value, err)))
}

pub fn format_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

pub fn format_display(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Converts `D/M/YYYY` into `YYYY-MM-DD`.
pub fn to_canonical(display: &str) -> Result<String> {
    parse_display(display).map(format_canonical)
}

/// Converts `YYYY-MM-DD` into `D/M/YYYY`.
pub fn to_display(canonical: &str) -> Result<String> {
    parse_canonical(canonical).map(format_display)
}

/// Accepts either a display or a canonical date and returns the canonical
/// text. Unparseable input is returned unchanged.
pub fn normalize_or_keep(raw: &str) -> String {
    if let Ok(date) = parse_display(raw) {
        return format_canonical(date);
    }
    if let Ok(date) = parse_canonical(raw) {
        return format_canonical(date);
    }
    tracing::warn!(date = raw, "keeping unparseable transaction date as entered");
    raw.to_string()
}

/// Parses user input given in either supported form.
pub fn parse_any(raw: &str) -> Result<NaiveDate> {
    parse_display(raw).or_else(|_| parse_canonical(raw))
}
