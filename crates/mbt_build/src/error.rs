//! Fatal orchestrator errors.

use mbt_discovery::DiscoveryError;

/// Errors that abort a run before any module is processed.
///
/// Everything that concerns a single module is reported as a
/// [`ModuleOutcome`](crate::ModuleOutcome) instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The source root could not be scanned.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}
