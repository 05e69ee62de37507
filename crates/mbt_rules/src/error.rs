//! Error types for descriptor evaluation.

use std::path::PathBuf;

/// A single module's descriptor could not be turned into rules.
///
/// These errors are per-module: the orchestrator reports them and moves on
/// to the next module without writing a manifest or recording the module.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    /// The descriptor file could not be read.
    #[error("cannot read descriptor {path}: {source}")]
    Io {
        /// The descriptor path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The descriptor is not valid TOML.
    #[error("invalid descriptor syntax in module '{module}': {message}")]
    Syntax {
        /// The module being evaluated.
        module: String,
        /// The parser's message, including the location.
        message: String,
    },

    /// The descriptor parsed but does not declare a valid rules object.
    #[error("invalid rules in module '{module}': {reason}")]
    Invalid {
        /// The module being evaluated.
        module: String,
        /// What is wrong with the declaration.
        reason: String,
    },
}

impl DescriptorError {
    pub(crate) fn invalid(module: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            module: module.to_string(),
            reason: reason.into(),
        }
    }
}
