//! The category-ledger store: owns one ledger snapshot and keeps its persisted
//! copy in sync after every mutation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::ledger::date_descending;
use crate::domain::{LedgerKind, LedgerSnapshot, SortKey, Transaction, TransactionDraft};
use crate::notify::UpdateNotifier;
use crate::seed;
use crate::storage::{self, KeyValueStore};

pub const CATEGORIES_KEY: &str = "categories";
pub const CATEGORIES_HASH_KEY: &str = "categories_hash";

/// Authoritative in-memory ledger for one [`LedgerKind`].
///
/// Every mutating call rewrites the affected documents in full, recomputes
/// totals, refreshes the sorted view and then raises the update signal, in
/// that order. Storage failures are logged and otherwise absorbed; malformed
/// persisted documents read as absent.
pub struct LedgerStore {
    kind: LedgerKind,
    storage: Box<dyn KeyValueStore>,
    notifier: Box<dyn UpdateNotifier>,
    snapshot: LedgerSnapshot,
    sort_key: SortKey,
    sorted: Vec<Transaction>,
}

impl LedgerStore {
    /// Loads the ledger from `storage` and applies the default-category check.
    pub fn open(
        kind: LedgerKind,
        storage: impl KeyValueStore + 'static,
        notifier: impl UpdateNotifier + 'static,
    ) -> Self {
        let mut store = Self {
            kind,
            storage: Box::new(storage),
            notifier: Box::new(notifier),
            snapshot: LedgerSnapshot::default(),
            sort_key: SortKey::default(),
            sorted: Vec::new(),
        };
        store.load();
        store.reseed_if_defaults_changed();
        tracing::info!(
            ledger = %kind,
            categories = store.snapshot.categories.len(),
            transactions = store.snapshot.transactions.len(),
            "ledger opened"
        );
        store
    }

    /// Ends the store's lifecycle.
    pub fn close(self) {
        tracing::debug!(ledger = %self.kind, "ledger closed");
    }

    /// Replaces the snapshot with persisted state, seeding default categories
    /// when none are stored. Nothing is written unless seeding happens.
    pub fn load(&mut self) {
        let (categories, seeded) = match self.read::<Vec<String>>(CATEGORIES_KEY) {
            Some(categories) => (categories, false),
            None => {
                let defaults = seed::default_categories(self.kind);
                tracing::info!(ledger = %self.kind, "seeding default categories");
                self.write(CATEGORIES_KEY, &defaults);
                (defaults, true)
            }
        };
        let transactions = self
            .read::<Vec<Transaction>>(self.kind.transactions_key())
            .unwrap_or_default();
        self.snapshot = LedgerSnapshot::new(categories, transactions);
        if seeded {
            self.write_totals();
        }
        self.resort();
    }

    /// Drops cached storage state and loads again without writing; the
    /// refresh path for consumers reacting to an update signal.
    pub fn reload(&mut self) {
        if let Err(err) = self.storage.refresh() {
            tracing::warn!(ledger = %self.kind, error = %err, "unable to refresh storage");
        }
        self.load();
    }

    /// Overwrites the category list with the shipped defaults when their hash
    /// differs from the stored one. Categories added by the user are lost in
    /// that case; transactions are left untouched.
    pub fn reseed_if_defaults_changed(&mut self) -> bool {
        let defaults = seed::default_categories(self.kind);
        let current_hash = seed::categories_hash(&defaults);
        let stored_hash = self.read_raw(CATEGORIES_HASH_KEY).unwrap_or_default();
        if stored_hash == current_hash {
            return false;
        }
        tracing::info!(
            ledger = %self.kind,
            stored = %stored_hash,
            current = %current_hash,
            "default categories changed, reseeding"
        );
        self.write(CATEGORIES_KEY, &defaults);
        self.put_raw(CATEGORIES_HASH_KEY, &current_hash);
        self.replace_categories(defaults);
        true
    }

    /// Installs `categories` as the whole category list.
    pub fn replace_categories(&mut self, categories: Vec<String>) {
        self.snapshot.categories = categories;
        self.write_categories();
        self.finish_mutation();
    }

    /// Appends `name` unless it is already present. Returns whether it was added.
    pub fn add_category(&mut self, name: &str) -> bool {
        if self.snapshot.has_category(name) {
            return false;
        }
        self.snapshot.categories.push(name.to_string());
        self.write_categories();
        self.finish_mutation();
        tracing::debug!(ledger = %self.kind, category = name, "category added");
        true
    }

    /// Renames `old` to `new` in the category list and on every transaction.
    ///
    /// Both documents are rewritten even when `old` does not exist. Renaming
    /// onto an existing name merges the two entries into the first position.
    pub fn rename_category(&mut self, old: &str, new: &str) {
        let mut seen = Vec::with_capacity(self.snapshot.categories.len());
        for category in self.snapshot.categories.drain(..) {
            let category = if category == old { new.to_string() } else { category };
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        self.snapshot.categories = seen;
        for txn in &mut self.snapshot.transactions {
            if txn.category == old {
                txn.category = new.to_string();
            }
        }
        self.write_categories();
        self.write_transactions();
        self.finish_mutation();
        tracing::debug!(ledger = %self.kind, from = old, to = new, "category renamed");
    }

    /// Removes `name` and every transaction filed under it. Returns the number
    /// of transactions removed.
    pub fn delete_category(&mut self, name: &str) -> usize {
        self.snapshot.categories.retain(|category| category != name);
        let before = self.snapshot.transactions.len();
        self.snapshot.transactions.retain(|txn| txn.category != name);
        let removed = before - self.snapshot.transactions.len();
        self.write_categories();
        self.write_transactions();
        self.finish_mutation();
        tracing::debug!(ledger = %self.kind, category = name, removed, "category deleted");
        removed
    }

    /// Appends a transaction built from `draft` and returns its id.
    ///
    /// Drafts with a negative or non-finite amount are rejected. A supplied id
    /// already held by another entry is replaced with a fresh one.
    pub fn add_transaction(&mut self, mut draft: TransactionDraft) -> Option<String> {
        if !valid_amount(draft.amount) {
            tracing::warn!(ledger = %self.kind, amount = draft.amount, "rejecting transaction amount");
            return None;
        }
        if let Some(taken) = draft
            .id
            .as_deref()
            .filter(|id| self.snapshot.transaction(id).is_some())
        {
            tracing::warn!(ledger = %self.kind, id = taken, "transaction id already in use, assigning a new one");
            draft.id = None;
        }
        let txn = draft.into_transaction();
        let id = txn.id.clone();
        self.snapshot.transactions.push(txn);
        self.write_transactions();
        self.finish_mutation();
        tracing::debug!(ledger = %self.kind, id = %id, "transaction added");
        Some(id)
    }

    /// Replaces the transaction sharing `updated.id`, keeping its position.
    /// Returns `false` without touching storage when no such id exists.
    pub fn update_transaction(&mut self, updated: Transaction) -> bool {
        if !valid_amount(updated.amount) {
            tracing::warn!(ledger = %self.kind, amount = updated.amount, "rejecting transaction amount");
            return false;
        }
        let Some(index) = self
            .snapshot
            .transactions
            .iter()
            .position(|txn| txn.id == updated.id)
        else {
            return false;
        };
        self.snapshot.transactions[index] = updated.normalized();
        self.write_transactions();
        self.finish_mutation();
        true
    }

    /// Removes the first transaction structurally equal to `target`.
    ///
    /// The transactions document is rewritten either way; the return value
    /// reports whether anything was removed.
    pub fn delete_transaction(&mut self, target: &Transaction) -> bool {
        let index = self
            .snapshot
            .transactions
            .iter()
            .position(|txn| txn == target);
        if let Some(index) = index {
            self.snapshot.transactions.remove(index);
        }
        self.write_transactions();
        self.finish_mutation();
        index.is_some()
    }

    /// Convenience over [`Self::delete_transaction`] for callers holding only an id.
    pub fn delete_transaction_by_id(&mut self, id: &str) -> bool {
        match self.snapshot.transaction(id).cloned() {
            Some(target) => self.delete_transaction(&target),
            None => false,
        }
    }

    /// Orders the transaction view by `key` and remembers it for later mutations.
    pub fn sort_by(&mut self, key: SortKey) -> &[Transaction] {
        self.sort_key = key;
        self.resort();
        &self.sorted
    }

    pub fn filter_by_category(&self, name: &str) -> Vec<Transaction> {
        self.filtered(|txn| txn.category == name)
    }

    /// Transactions dated within `[start, end]`, optionally limited to one
    /// category. Entries whose date cannot be parsed never match.
    pub fn filter_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        category: Option<&str>,
    ) -> Vec<Transaction> {
        self.filtered(|txn| {
            let in_range = txn
                .calendar_date()
                .map_or(false, |date| start <= date && date <= end);
            in_range && category.map_or(true, |name| txn.category == name)
        })
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn categories(&self) -> &[String] {
        &self.snapshot.categories
    }

    /// Transactions in storage order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.snapshot.transactions
    }

    /// Transactions ordered by the active sort key.
    pub fn sorted_transactions(&self) -> &[Transaction] {
        &self.sorted
    }

    pub fn category_totals(&self) -> &BTreeMap<String, f64> {
        &self.snapshot.category_totals
    }

    pub fn total(&self) -> f64 {
        self.snapshot.total
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    fn filtered(&self, predicate: impl Fn(&Transaction) -> bool) -> Vec<Transaction> {
        let mut matches: Vec<Transaction> = self
            .snapshot
            .transactions
            .iter()
            .filter(|txn| predicate(txn))
            .cloned()
            .collect();
        matches.sort_by(date_descending);
        matches
    }

    fn finish_mutation(&mut self) {
        self.snapshot.recompute_totals();
        self.write_totals();
        self.resort();
        self.notifier.notify();
    }

    fn resort(&mut self) {
        let mut sorted = self.snapshot.transactions.clone();
        self.sort_key.apply(&mut sorted);
        self.sorted = sorted;
    }

    fn write_categories(&self) {
        self.write(CATEGORIES_KEY, &self.snapshot.categories);
    }

    fn write_transactions(&self) {
        self.write(self.kind.transactions_key(), &self.snapshot.transactions);
    }

    fn write_totals(&self) {
        self.write(self.kind.totals_key(), &self.snapshot.category_totals);
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match storage::read_json(self.storage.as_ref(), key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(ledger = %self.kind, key, error = %err, "treating unreadable value as absent");
                None
            }
        }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(ledger = %self.kind, key, error = %err, "treating unreadable value as absent");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = storage::write_json(self.storage.as_ref(), key, value) {
            tracing::warn!(ledger = %self.kind, key, error = %err, "failed to persist value");
        }
    }

    fn put_raw(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.put(key, value) {
            tracing::warn!(ledger = %self.kind, key, error = %err, "failed to persist value");
        }
    }
}

fn valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}
