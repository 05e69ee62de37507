//! Error types for module discovery.

use std::path::PathBuf;

/// Fatal discovery errors. Only problems with the source root itself are fatal;
/// unreadable subtrees are reported as [`SkippedDir`](crate::SkippedDir) instead.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The source root does not exist or is not a directory.
    #[error("source directory {path} does not exist or is not a directory")]
    SourceRootMissing {
        /// The configured source root.
        path: PathBuf,
    },

    /// The source root exists but could not be listed.
    #[error("cannot read source directory {path}: {source}")]
    SourceRootUnreadable {
        /// The configured source root.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_display() {
        let err = DiscoveryError::SourceRootMissing {
            path: PathBuf::from("/nope/Source"),
        };
        assert_eq!(
            err.to_string(),
            "source directory /nope/Source does not exist or is not a directory"
        );
    }

    #[test]
    fn unreadable_root_display() {
        let err = DiscoveryError::SourceRootUnreadable {
            path: PathBuf::from("/locked"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("cannot read source directory /locked"));
        assert!(msg.contains("denied"));
    }
}
