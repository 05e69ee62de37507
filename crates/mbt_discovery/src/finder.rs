//! Depth-first descriptor search with early termination.

use std::io;
use std::path::{Path, PathBuf};

use mbt_common::{DescriptorNaming, Module};

use crate::error::DiscoveryError;

/// A directory whose subtree contributed no modules because it could not be
/// listed or its path cannot be recorded.
#[derive(Debug, Clone)]
pub struct SkippedDir {
    /// The directory that was skipped.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// The result of scanning a source tree.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Discovered modules, in traversal order (directories sorted by name).
    pub modules: Vec<Module>,
    /// Subtrees that vanished or were unreadable and contributed no modules.
    pub skipped: Vec<SkippedDir>,
}

/// Returns one module per descriptor found under `source_root`.
///
/// See [`scan`] for the traversal rules.
pub fn discover(
    source_root: &Path,
    naming: &DescriptorNaming,
) -> Result<Vec<Module>, DiscoveryError> {
    scan(source_root, naming).map(|d| d.modules)
}

/// Scans `source_root` for modules.
///
/// Every direct subdirectory of the root is searched depth-first. At each
/// level the directory's own files are checked first; if one matches the
/// descriptor naming, that directory is a module and its children are not
/// visited. Files directly inside the root are never descriptors.
///
/// When a directory holds several descriptors, the one named after the
/// directory wins; otherwise the first in sorted order is used.
///
/// Only a missing or unreadable root is an error. A subdirectory that cannot
/// be listed, or a module directory whose path is not valid UTF-8, is
/// recorded in [`Discovery::skipped`] and contributes nothing.
/// Symbolic links to directories are not followed.
pub fn scan(source_root: &Path, naming: &DescriptorNaming) -> Result<Discovery, DiscoveryError> {
    if !source_root.is_dir() {
        return Err(DiscoveryError::SourceRootMissing {
            path: source_root.to_path_buf(),
        });
    }

    let root = list_dir(source_root).map_err(|e| DiscoveryError::SourceRootUnreadable {
        path: source_root.to_path_buf(),
        source: e,
    })?;

    let mut discovery = Discovery::default();
    for dir in &root.dirs {
        search(dir, naming, &mut discovery);
    }

    tracing::debug!(
        root = %source_root.display(),
        modules = discovery.modules.len(),
        skipped = discovery.skipped.len(),
        "module discovery finished"
    );
    Ok(discovery)
}

fn search(dir: &Path, naming: &DescriptorNaming, out: &mut Discovery) {
    let listing = match list_dir(dir) {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            out.skipped.push(SkippedDir {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };

    let dir_name = dir.file_name().and_then(|n| n.to_str());
    let descriptors: Vec<(String, &PathBuf)> = listing
        .files
        .iter()
        .filter_map(|f| naming.module_name(f).map(|name| (name, f)))
        .collect();

    if !descriptors.is_empty() {
        if dir.to_str().is_none() {
            tracing::warn!(dir = %dir.display(), "skipping module with a non-UTF-8 path");
            out.skipped.push(SkippedDir {
                path: dir.to_path_buf(),
                reason: "path is not valid UTF-8".to_string(),
            });
            return;
        }

        let chosen = descriptors
            .iter()
            .position(|(name, _)| Some(name.as_str()) == dir_name)
            .unwrap_or(0);
        let (name, descriptor) = descriptors[chosen].clone();
        if descriptors.len() > 1 {
            let ignored: Vec<_> = descriptors
                .iter()
                .filter(|(_, f)| *f != descriptor)
                .map(|(_, f)| f.display().to_string())
                .collect();
            tracing::warn!(
                dir = %dir.display(),
                used = %descriptor.display(),
                ignored = ?ignored,
                "directory contains more than one descriptor"
            );
        }
        if dir_name != Some(name.as_str()) {
            tracing::warn!(
                dir = %dir.display(),
                module = %name,
                "descriptor name does not match its directory"
            );
        }
        out.modules
            .push(Module::new(name, dir.to_path_buf(), descriptor.clone()));
        return;
    }

    for child in &listing.dirs {
        search(child, naming, out);
    }
}

/// Sorted directory contents, split into subdirectories and files.
struct Listing {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

fn list_dir(dir: &Path) -> io::Result<Listing> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            dirs.push(path);
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            files.push(path);
        }
    }
    dirs.sort();
    files.sort();
    Ok(Listing { dirs, files })
}
