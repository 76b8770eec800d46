pub mod category;
pub mod system;
pub mod transaction;

use chrono::NaiveDate;

use crate::cli::error::CommandError;
use crate::cli::registry::CommandEntry;
use crate::dates;

/// Every shell command in help order.
pub(crate) fn definitions() -> Vec<CommandEntry> {
    let mut entries = system::definitions();
    entries.extend(category::definitions());
    entries.extend(transaction::definitions());
    entries
}

pub(crate) fn require_args(args: &[&str], min: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < min {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    }
    Ok(())
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not an amount", raw)))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(CommandError::InvalidArguments(
            "amount must be a non-negative number".into(),
        ));
    }
    Ok(amount)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    dates::parse_any(raw).map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a date (use D/M/YYYY)", raw))
    })
}

/// Joins trailing words into an optional comment.
pub(crate) fn comment_from(words: &[&str]) -> Option<String> {
    let joined = words.join(" ");
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_be_non_negative_numbers() {
        assert_eq!(parse_amount("12.5").unwrap(), 12.5);
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("ten").is_err());
    }

    #[test]
    fn dates_accept_both_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(parse_date("1/2/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-02-01").unwrap(), expected);
        assert!(parse_date("2024/02/01").is_err());
    }

    #[test]
    fn comments_join_trailing_words() {
        assert_eq!(comment_from(&["first", "payout"]).as_deref(), Some("first payout"));
        assert_eq!(comment_from(&[]), None);
    }
}
