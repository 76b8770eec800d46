//! Ledger-wide value types: the ledger kind, sort keys, and the in-memory snapshot.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::common::{sum_amounts, Identifiable};
use crate::domain::transaction::Transaction;

/// Financial direction a ledger tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LedgerKind {
    Income,
    Expense,
}

impl LedgerKind {
    /// Preference namespace holding this ledger's keys.
    pub fn namespace(self) -> &'static str {
        match self {
            LedgerKind::Income => "IncomePrefs",
            LedgerKind::Expense => "ExpensePrefs",
        }
    }

    pub fn transactions_key(self) -> &'static str {
        match self {
            LedgerKind::Income => "IncomeTransactions",
            LedgerKind::Expense => "ExpenseTransactions",
        }
    }

    /// Key of the derived per-category totals document.
    pub fn totals_key(self) -> &'static str {
        match self {
            LedgerKind::Income => "incomes",
            LedgerKind::Expense => "expenses",
        }
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LedgerKind::Income => "Income",
            LedgerKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for LedgerKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "incomes" => Ok(LedgerKind::Income),
            "expense" | "expenses" => Ok(LedgerKind::Expense),
            other => Err(format!("unknown ledger `{}`", other)),
        }
    }
}

/// Ordering applied to the sorted transaction view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Largest first.
    Amount,
    /// Alphabetical by category name.
    Category,
}

impl SortKey {
    /// Sorts `transactions` in place. The sort is stable.
    pub fn apply(self, transactions: &mut [Transaction]) {
        match self {
            SortKey::Date => transactions.sort_by(date_descending),
            SortKey::Amount => transactions.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
            SortKey::Category => transactions.sort_by(|a, b| a.category.cmp(&b.category)),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "category" => Ok(SortKey::Category),
            other => Err(format!("unknown sort key `{}`", other)),
        }
    }
}

/// Newest calendar date first; entries with unparseable dates sink to the end.
pub(crate) fn date_descending(a: &Transaction, b: &Transaction) -> Ordering {
    b.calendar_date().cmp(&a.calendar_date())
}

/// In-memory materialization of one ledger.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LedgerSnapshot {
    pub categories: Vec<String>,
    pub transactions: Vec<Transaction>,
    pub category_totals: BTreeMap<String, f64>,
    pub total: f64,
}

impl LedgerSnapshot {
    pub fn new(categories: Vec<String>, transactions: Vec<Transaction>) -> Self {
        let mut snapshot = Self {
            categories,
            transactions,
            category_totals: BTreeMap::new(),
            total: 0.0,
        };
        snapshot.recompute_totals();
        snapshot
    }

    /// Rebuilds `category_totals` and `total` from scratch.
    pub fn recompute_totals(&mut self) {
        self.category_totals = self
            .categories
            .iter()
            .map(|category| {
                let sum = sum_amounts(
                    self.transactions
                        .iter()
                        .filter(|txn| &txn.category == category),
                );
                (category.clone(), sum)
            })
            .collect();
        self.total = sum_amounts(&self.transactions);
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category == name)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id() == id)
    }

    /// Per-category totals in category-list order.
    pub fn totals_in_order(&self) -> Vec<(&str, f64)> {
        self.categories
            .iter()
            .map(|category| {
                let total = self.category_totals.get(category).copied().unwrap_or(0.0);
                (category.as_str(), total)
            })
            .collect()
    }
}
