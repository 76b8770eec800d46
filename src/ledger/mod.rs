//! Category-ledger store and its shared handle.

pub mod shared;
pub mod store;

pub use shared::SharedLedgerStore;
pub use store::{LedgerStore, CATEGORIES_HASH_KEY, CATEGORIES_KEY};
