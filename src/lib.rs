#![doc(test(attr(deny(warnings))))]

//! Home Ledger tracks income and expense categories and their transactions,
//! keeping per-category totals current and every change persisted.

pub mod cli;
pub mod config;
pub mod currency;
pub mod dates;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod notify;
pub mod seed;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Home Ledger tracing initialized.");
    });
}
