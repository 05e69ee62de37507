//! Error types for manifest output and input.

use std::path::PathBuf;

/// Errors that can occur when writing or reading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The output directory could not be created or the file could not be
    /// written or read.
    #[error("manifest I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The XML encoder or decoder failed.
    #[error("manifest XML error: {reason}")]
    Xml {
        /// Description of the failure.
        reason: String,
    },

    /// The document is well-formed XML but not a module manifest.
    #[error("malformed manifest: {reason}")]
    Malformed {
        /// What is wrong with the document.
        reason: String,
    },
}

impl From<quick_xml::Error> for ManifestError {
    fn from(e: quick_xml::Error) -> Self {
        ManifestError::Xml {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = ManifestError::Io {
            path: PathBuf::from("/build/Modules/Core.xml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("manifest I/O error"));
        assert!(msg.contains("Core.xml"));
    }

    #[test]
    fn malformed_display() {
        let err = ManifestError::Malformed {
            reason: "root element is <Project>".to_string(),
        };
        assert_eq!(err.to_string(), "malformed manifest: root element is <Project>");
    }
}
