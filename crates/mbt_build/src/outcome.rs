//! Per-module results and the run summary.

use std::fmt;
use std::path::PathBuf;

use mbt_common::Module;

/// What happened to one module during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// The ledger says the module is up to date.
    Skipped,
    /// The descriptor was evaluated and the manifest written.
    Built {
        /// Path of the written manifest.
        manifest: PathBuf,
    },
    /// The descriptor could not be evaluated. No manifest was written.
    DescriptorFailed {
        /// The evaluation error message.
        reason: String,
    },
    /// The rules were produced but the manifest could not be written.
    ManifestFailed {
        /// The write error message.
        reason: String,
    },
}

impl ModuleOutcome {
    /// Returns `true` for either failure variant.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ModuleOutcome::DescriptorFailed { .. } | ModuleOutcome::ManifestFailed { .. }
        )
    }
}

impl fmt::Display for ModuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleOutcome::Skipped => f.write_str("up to date"),
            ModuleOutcome::Built { manifest } => write!(f, "wrote {}", manifest.display()),
            ModuleOutcome::DescriptorFailed { reason } => write!(f, "descriptor failed: {reason}"),
            ModuleOutcome::ManifestFailed { reason } => write!(f, "manifest failed: {reason}"),
        }
    }
}

/// A module paired with its outcome.
#[derive(Clone, Debug)]
pub struct ModuleReport {
    /// The discovered module.
    pub module: Module,
    /// What happened to it.
    pub outcome: ModuleOutcome,
}

/// The result of one orchestrator run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// One report per discovered module, in discovery order.
    pub outcomes: Vec<ModuleReport>,
    /// Whether the ledger was written at the end of the run.
    pub persisted: bool,
}

impl RunSummary {
    /// Number of modules whose manifest was written.
    pub fn built(&self) -> usize {
        self.count(|o| matches!(o, ModuleOutcome::Built { .. }))
    }

    /// Number of modules skipped as up to date.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ModuleOutcome::Skipped))
    }

    /// Number of modules that failed evaluation or writing.
    pub fn failed(&self) -> usize {
        self.count(ModuleOutcome::is_failure)
    }

    /// Iterates over the reports of failed modules.
    pub fn failures(&self) -> impl Iterator<Item = &ModuleReport> {
        self.outcomes.iter().filter(|r| r.outcome.is_failure())
    }

    /// Returns the report for the module named `name`.
    pub fn report(&self, name: &str) -> Option<&ModuleReport> {
        self.outcomes.iter().find(|r| r.module.name == name)
    }

    /// Process exit code: `2` if the ledger could not be written, `1` if any
    /// module failed, `0` otherwise.
    pub fn exit_code(&self) -> i32 {
        if !self.persisted {
            2
        } else if self.failed() > 0 {
            1
        } else {
            0
        }
    }

    fn count(&self, pred: impl Fn(&ModuleOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|r| pred(&r.outcome)).count()
    }
}
