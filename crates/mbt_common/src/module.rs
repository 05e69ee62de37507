//! A discovered unit of the source tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One buildable module: a directory plus the single descriptor directly inside it.
///
/// Discovery constructs these; the staleness ledger is keyed by
/// [`directory`](Self::directory) and the manifest is named after
/// [`name`](Self::name).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Module {
    /// Module name taken from the descriptor file name.
    pub name: String,
    /// Absolute path of the module directory.
    pub directory: PathBuf,
    /// Absolute path of the module's descriptor file.
    pub descriptor: PathBuf,
}

impl Module {
    /// Creates a module from its name, directory, and descriptor path.
    pub fn new(name: impl Into<String>, directory: PathBuf, descriptor: PathBuf) -> Self {
        Self {
            name: name.into(),
            directory,
            descriptor,
        }
    }

    /// Returns `true` if this module's directory is a strict ancestor of `other`'s.
    pub fn is_ancestor_of(&self, other: &Module) -> bool {
        other.directory != self.directory && other.directory.starts_with(&self.directory)
    }

    /// Returns the module directory as a path.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.directory.display())
    }
}
