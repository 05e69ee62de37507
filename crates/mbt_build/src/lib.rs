//! The module build orchestrator.
//!
//! Ties discovery, descriptor evaluation, manifest writing, and the staleness
//! ledger into one run. Per-module failures are isolated: they are reported
//! into the [`DiagnosticSink`](mbt_diagnostics::DiagnosticSink) and the run
//! continues with the next module. Only an unusable source root aborts.

#![warn(missing_docs)]

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod orchestrator;
pub mod outcome;

pub use context::BuildContext;
pub use diagnostics::skipped_diagnostic;
pub use error::BuildError;
pub use orchestrator::{generate, run};
pub use outcome::{ModuleOutcome, ModuleReport, RunSummary};
