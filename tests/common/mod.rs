#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use home_ledger::{
    cli::{CliMode, ShellContext},
    domain::{LedgerKind, TransactionDraft},
    ledger::LedgerStore,
    notify::{CountingNotifier, NoopNotifier},
    storage::MemoryStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_root() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Store over a shared in-memory namespace; reopen it by passing the same `Arc`.
pub fn memory_store(kind: LedgerKind) -> (LedgerStore, Arc<MemoryStore>) {
    let backing = Arc::new(MemoryStore::new());
    let store = LedgerStore::open(kind, Arc::clone(&backing), NoopNotifier);
    (store, backing)
}

pub fn counted_store(kind: LedgerKind) -> (LedgerStore, CountingNotifier) {
    let (store, _, notifier) = counted_memory_store(kind);
    (store, notifier)
}

pub fn counted_memory_store(kind: LedgerKind) -> (LedgerStore, Arc<MemoryStore>, CountingNotifier) {
    let backing = Arc::new(MemoryStore::new());
    let notifier = CountingNotifier::new();
    let store = LedgerStore::open(kind, Arc::clone(&backing), notifier.clone());
    (store, backing, notifier)
}

/// Income store whose category list is exactly `categories`.
pub fn store_with_categories(categories: &[&str]) -> (LedgerStore, Arc<MemoryStore>) {
    let (mut store, backing) = memory_store(LedgerKind::Income);
    store.replace_categories(categories.iter().map(|name| name.to_string()).collect());
    (store, backing)
}

pub fn draft(category: &str, amount: f64, date: &str) -> TransactionDraft {
    TransactionDraft::new(category, amount, date)
}

/// Script-mode shell rooted in its own temporary directory.
pub fn script_context() -> (ShellContext, PathBuf) {
    let root = temp_root();
    let context =
        ShellContext::with_root(CliMode::Script, Some(root.clone())).expect("create shell context");
    (context, root)
}
