//! Error types for ledger operations.

use std::path::PathBuf;

/// Errors that can occur while loading or persisting the staleness ledger.
///
/// Load errors are never fatal: [`StalenessLedger::load`](crate::StalenessLedger::load)
/// falls back to an empty ledger, which forces every module to rebuild.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// An I/O error occurred while reading or writing the ledger file.
    #[error("ledger I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The ledger file exists but its content cannot be interpreted.
    #[error("corrupt ledger {path}: {reason}")]
    Corrupt {
        /// The ledger file path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },
}
