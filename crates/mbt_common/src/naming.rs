//! The file naming convention that marks a directory as a module.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default suffix of a module descriptor file (`Core/Core.Build.toml`).
pub const DEFAULT_DESCRIPTOR_SUFFIX: &str = ".Build.toml";

/// Maps between module directories, module names, and descriptor file names.
///
/// A descriptor is named `<ModuleName><suffix>`. The suffix is matched as a
/// whole, so `Core.Build.toml` yields the module name `Core` rather than
/// `Core.Build`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorNaming {
    suffix: String,
}

impl DescriptorNaming {
    /// Creates a naming convention for the given suffix (e.g. `".Build.toml"`).
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Returns the descriptor suffix, including its leading dot.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns `true` if `path` names a descriptor file.
    ///
    /// Only the file name is inspected; the file itself is not touched.
    pub fn matches(&self, path: &Path) -> bool {
        self.module_name(path).is_some()
    }

    /// Extracts the module name from a descriptor path.
    ///
    /// Returns `None` if the file name does not end with the suffix or if
    /// nothing precedes the suffix.
    pub fn module_name(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        let stem = file_name.strip_suffix(self.suffix.as_str())?;
        if stem.is_empty() {
            None
        } else {
            Some(stem.to_string())
        }
    }
}

impl Default for DescriptorNaming {
    fn default() -> Self {
        Self::new(DEFAULT_DESCRIPTOR_SUFFIX)
    }
}
