//! Configuration types: the on-disk `mbt.toml` shape and the resolved [`ToolConfig`].

use mbt_common::{DescriptorNaming, DEFAULT_DESCRIPTOR_SUFFIX};
use serde::Deserialize;
use std::path::PathBuf;

/// Default extension of generated manifest files.
pub const DEFAULT_MANIFEST_EXTENSION: &str = "xml";

/// Name of the build directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "Build";

/// Name of the intermediate directory, relative to the project root.
pub const DEFAULT_INTERMEDIATE_DIR: &str = "Intermediate";

/// Subdirectory of the build directory that receives module manifests.
pub const MODULES_SUBDIR: &str = "Modules";

/// The optional project file, deserialized from `mbt.toml`.
///
/// Every section and key is optional. Unknown keys are rejected so that a
/// misspelled setting does not silently fall back to its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    /// Output directory overrides.
    #[serde(default)]
    pub paths: PathsSection,
    /// Descriptor naming settings.
    #[serde(default)]
    pub descriptor: DescriptorSection,
    /// Manifest output settings.
    #[serde(default)]
    pub manifest: ManifestSection,
    /// Orchestrator settings.
    #[serde(default)]
    pub build: BuildSection,
}

/// `[paths]`: directories relative to the project root (the source directory's parent).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Build directory (default `Build`).
    pub build: Option<String>,
    /// Intermediate directory (default `Intermediate`).
    pub intermediate: Option<String>,
}

/// `[descriptor]`: how descriptor files are recognized.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorSection {
    /// File name suffix, including the leading dot.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for DescriptorSection {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
        }
    }
}

fn default_suffix() -> String {
    DEFAULT_DESCRIPTOR_SUFFIX.to_string()
}

/// `[manifest]`: output encoding settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestSection {
    /// File extension of generated manifests, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ManifestSection {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

fn default_extension() -> String {
    DEFAULT_MANIFEST_EXTENSION.to_string()
}

/// `[build]`: orchestrator settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Number of worker threads. `0` means one per available CPU.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
        }
    }
}

fn default_jobs() -> usize {
    1
}

/// The fully resolved tool configuration.
///
/// All directories are absolute and lexically normalized. This value is
/// built once and borrowed by discovery, the ledger, and the manifest writer.
#[derive(Clone, Debug)]
pub struct ToolConfig {
    /// Root of the source tree to scan for modules.
    pub source_dir: PathBuf,
    /// Build directory; holds the ledger file.
    pub build_dir: PathBuf,
    /// Intermediate directory for downstream build steps.
    pub intermediate_dir: PathBuf,
    /// Directory that receives one manifest per module.
    pub build_module_dir: PathBuf,
    /// Descriptor naming convention.
    pub naming: DescriptorNaming,
    /// Manifest file extension, without the dot.
    pub manifest_extension: String,
    /// Requested worker count (`0` = one per CPU).
    pub jobs: usize,
}

impl ToolConfig {
    /// Returns the worker count to use, resolving `0` to the available parallelism.
    pub fn effective_jobs(&self) -> usize {
        match self.jobs {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }
}
