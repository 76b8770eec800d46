//! Ledger entries and the drafts they are created from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;
use crate::domain::common::{Amounted, Displayable, Identifiable};

/// A single income or expense entry.
///
/// `date` is always held in the canonical `YYYY-MM-DD` form once the entry is
/// part of a ledger. Equality is structural across every field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Transaction {
    /// Builds a transaction with a freshly generated identifier.
    pub fn new(
        category: impl Into<String>,
        amount: f64,
        date: impl Into<String>,
        comments: Option<String>,
    ) -> Self {
        Self {
            id: new_transaction_id(),
            category: category.into(),
            amount,
            date: date.into(),
            comments,
        }
    }

    /// Calendar date of the entry, or `None` when the stored text is not canonical.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        dates::parse_canonical(&self.date).ok()
    }

    /// Returns a copy whose date has been normalized to the canonical form.
    pub fn normalized(mut self) -> Self {
        self.date = dates::normalize_or_keep(&self.date);
        self
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        let date = dates::to_display(&self.date).unwrap_or_else(|_| self.date.clone());
        match self.comments.as_deref() {
            Some(comment) => format!("{} {} {:.2} ({})", date, self.category, self.amount, comment),
            None => format!("{} {} {:.2}", date, self.category, self.amount),
        }
    }
}

/// Candidate entry handed to `LedgerStore::add_transaction`.
///
/// The identifier is optional and the date may still be in the `D/M/YYYY`
/// display form.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub id: Option<String>,
    pub category: String,
    pub amount: f64,
    pub date: String,
    pub comments: Option<String>,
}

impl TransactionDraft {
    pub fn new(category: impl Into<String>, amount: f64, date: impl Into<String>) -> Self {
        Self {
            id: None,
            category: category.into(),
            amount,
            date: date.into(),
            comments: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attaches a comment; blank text is treated as no comment.
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        let comments = comments.into();
        self.comments = if comments.trim().is_empty() {
            None
        } else {
            Some(comments)
        };
        self
    }

    /// Materializes the draft, assigning an id when absent and normalizing the date.
    pub fn into_transaction(self) -> Transaction {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => new_transaction_id(),
        };
        Transaction {
            id,
            category: self.category,
            amount: self.amount,
            date: self.date,
            comments: self.comments,
        }
        .normalized()
    }
}

impl From<Transaction> for TransactionDraft {
    fn from(txn: Transaction) -> Self {
        Self {
            id: Some(txn.id),
            category: txn.category,
            amount: txn.amount,
            date: txn.date,
            comments: txn.comments,
        }
    }
}

fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_without_id_receives_fresh_uuid() {
        let first = TransactionDraft::new("Salary", 10.0, "1/1/2024").into_transaction();
        let second = TransactionDraft::new("Salary", 10.0, "1/1/2024").into_transaction();
        assert!(Uuid::parse_str(&first.id).is_ok());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn draft_keeps_supplied_id_and_normalizes_date() {
        let txn = TransactionDraft::new("Salary", 10.0, "2/1/2024")
            .with_id("fixed")
            .into_transaction();
        assert_eq!(txn.id, "fixed");
        assert_eq!(txn.date, "2024-01-02");
        assert_eq!(
            txn.calendar_date(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn blank_comments_are_dropped() {
        let draft = TransactionDraft::new("Gifts", 5.0, "1/1/2024").with_comments("   ");
        assert!(draft.comments.is_none());
    }

    #[test]
    fn serialization_omits_missing_comments() {
        let txn = Transaction {
            id: "t1".into(),
            category: "Salary".into(),
            amount: 100.0,
            date: "2024-01-01".into(),
            comments: None,
        };
        let json = serde_json::to_string(&txn).unwrap();
        assert_eq!(
            json,
            r#"{"id":"t1","category":"Salary","amount":100.0,"date":"2024-01-01"}"#
        );
        let decoded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, txn);
    }

    #[test]
    fn display_label_uses_display_date() {
        let txn = Transaction {
            id: "t1".into(),
            category: "Salary".into(),
            amount: 12.5,
            date: "2024-03-07".into(),
            comments: Some("March".into()),
        };
        assert_eq!(txn.display_label(), "7/3/2024 Salary 12.50 (March)");
    }
}
