pub mod common;
pub mod ledger;
pub mod transaction;

pub use common::{Amounted, Displayable, Identifiable};
pub use ledger::{LedgerKind, LedgerSnapshot, SortKey};
pub use transaction::{Transaction, TransactionDraft};
