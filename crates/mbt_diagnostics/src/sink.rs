//! Collects diagnostics from module workers running in parallel.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::code::Category;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// A thread-safe accumulator for the diagnostics of one run.
///
/// Workers [`emit`](Self::emit) concurrently, so diagnostics arrive in
/// completion order. [`take_in_module_order`](Self::take_in_module_order)
/// restores the discovery order for reporting. Error and warning counts are
/// kept atomically and survive draining.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    errors: AtomicUsize,
    warnings: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            errors: AtomicUsize::new(0),
            warnings: AtomicUsize::new(0),
        }
    }

    /// Adds a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        match diag.severity {
            Severity::Error => self.errors.fetch_add(1, Ordering::Relaxed),
            Severity::Warning => self.warnings.fetch_add(1, Ordering::Relaxed),
            Severity::Note => 0,
        };
        self.lock().push(diag);
    }

    /// Returns `true` if any error was emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors emitted so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Number of warnings emitted so far.
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    /// The most serious severity among the diagnostics currently held.
    pub fn worst(&self) -> Option<Severity> {
        self.lock().iter().map(|d| d.severity).max()
    }

    /// Diagnostics currently held for the module named `module`.
    pub fn for_module(&self, module: &str) -> Vec<Diagnostic> {
        self.lock()
            .iter()
            .filter(|d| d.module.as_deref() == Some(module))
            .cloned()
            .collect()
    }

    /// Names of modules with at least one error, sorted.
    pub fn failed_modules(&self) -> BTreeSet<String> {
        self.lock()
            .iter()
            .filter(|d| d.severity.is_error())
            .filter_map(|d| d.module.clone())
            .collect()
    }

    /// Number of diagnostics currently held whose code is in `category`.
    pub fn count_in(&self, category: Category) -> usize {
        self.lock()
            .iter()
            .filter(|d| d.code.category == category)
            .count()
    }

    /// Drains the sink in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Drains the sink with module diagnostics grouped in the given order.
    ///
    /// Diagnostics without a module come first. Modules missing from `order`
    /// come last. Within one group the emission order is kept.
    pub fn take_in_module_order<'a, I>(&self, order: I) -> Vec<Diagnostic>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rank: HashMap<&str, usize> = order
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name, i + 1))
            .collect();
        let mut diagnostics = self.take_all();
        diagnostics.sort_by_key(|d| match d.module.as_deref() {
            None => 0,
            Some(name) => rank.get(name).copied().unwrap_or(usize::MAX),
        });
        diagnostics
    }

    /// A copy of the diagnostics currently held.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
