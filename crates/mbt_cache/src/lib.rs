//! Incremental-build state for module evaluation.
//!
//! The [`StalenessLedger`] records which module directories were processed
//! successfully by the last run, so unchanged modules can be skipped.

#![warn(missing_docs)]

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::{StalenessLedger, LEDGER_FILE, LEDGER_VERSION};
