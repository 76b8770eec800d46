use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::LedgerSnapshot;

use super::store::LedgerStore;

/// Cloneable handle that funnels every operation on one [`LedgerStore`]
/// through a single critical section.
///
/// Update notifiers attached to the wrapped store must not call back into
/// the same handle synchronously.
#[derive(Clone)]
pub struct SharedLedgerStore {
    inner: Arc<Mutex<LedgerStore>>,
}

impl SharedLedgerStore {
    pub fn new(store: LedgerStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut LedgerStore) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.lock().snapshot().clone()
    }

    /// A panic inside an earlier operation leaves the snapshot consistent
    /// with what was persisted, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, LedgerStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LedgerKind, TransactionDraft};
    use crate::notify::NoopNotifier;
    use crate::storage::MemoryStore;
    use std::thread;

    #[test]
    fn concurrent_writers_are_serialized() {
        let mut store = LedgerStore::open(LedgerKind::Income, MemoryStore::new(), NoopNotifier);
        store.replace_categories(vec!["Salary".into()]);
        let shared = SharedLedgerStore::new(store);

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for step in 0..25 {
                        let amount = f64::from(worker * 100 + step);
                        shared.with(|store| {
                            store.add_transaction(TransactionDraft::new("Salary", amount, "1/1/2024"))
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread");
        }

        let snapshot = shared.snapshot();
        let expected: f64 = (0..4)
            .flat_map(|worker| (0..25).map(move |step| f64::from(worker * 100 + step)))
            .sum();
        assert_eq!(snapshot.transactions.len(), 100);
        assert_eq!(snapshot.total, expected);
        assert_eq!(snapshot.category_totals["Salary"], expected);
    }
}
