//! Change signal raised after every ledger mutation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Zero-argument signal telling other consumers of the same persisted state
/// to refresh. Delivery is up to the implementation.
pub trait UpdateNotifier: Send + Sync {
    fn notify(&self);
}

impl<F> UpdateNotifier for F
where
    F: Fn() + Send + Sync,
{
    fn notify(&self) {
        self()
    }
}

/// Notifier that drops every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl UpdateNotifier for NoopNotifier {
    fn notify(&self) {}
}

/// Counts signals; handy for asserting fan-out in tests.
#[derive(Debug, Default, Clone)]
pub struct CountingNotifier {
    count: Arc<AtomicUsize>,
}

impl CountingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl UpdateNotifier for CountingNotifier {
    fn notify(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
