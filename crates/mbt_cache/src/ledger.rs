//! The staleness ledger.
//!
//! The ledger is a plain-text file listing every module directory whose
//! manifest was produced successfully by the last run:
//!
//! ```text
//! Version: 1
//! /project/Source/Core
//! /project/Source/Runtime/Sockets
//! ```
//!
//! The file's own modification time is the shared baseline for all entries:
//! a module is stale when its descriptor was modified after the ledger was
//! last written. Loading is fail-safe; a missing or unreadable ledger yields
//! an empty one, which forces every module to rebuild.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use mbt_common::Module;

use crate::error::LedgerError;

/// Current ledger format version. Ledgers with any other version are stale.
pub const LEDGER_VERSION: u32 = 1;

/// File name of the ledger inside the build directory.
pub const LEDGER_FILE: &str = "ModuleBuildTimestamp";

/// Prefix of the header line carrying the format version.
const VERSION_PREFIX: &str = "Version: ";

/// Records which modules were processed successfully and when.
#[derive(Debug, Clone)]
pub struct StalenessLedger {
    /// Format version read from disk.
    version: u32,
    /// Module directory paths, kept sorted for stable output.
    entries: BTreeSet<PathBuf>,
    /// Modification time of the ledger file when it was loaded or persisted.
    timestamp: SystemTime,
}

impl StalenessLedger {
    /// Creates an empty ledger at the current format version.
    ///
    /// Its timestamp is the Unix epoch, so it predates every descriptor.
    pub fn new() -> Self {
        Self {
            version: LEDGER_VERSION,
            entries: BTreeSet::new(),
            timestamp: SystemTime::UNIX_EPOCH,
        }
    }

    /// Creates the empty, outdated ledger that replaces an unusable file.
    ///
    /// Its version is `0`, so every module is stale until the next persist.
    pub fn discarded() -> Self {
        Self {
            version: 0,
            ..Self::new()
        }
    }

    /// Loads the ledger at `path`, falling back to an empty ledger.
    ///
    /// A missing file is the normal first-run case and is silent. Any other
    /// failure is logged and discarded.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no ledger found; starting fresh");
            return Self::new();
        }
        match Self::try_load(path) {
            Ok(ledger) => ledger,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unusable ledger; all modules will rebuild");
                Self::discarded()
            }
        }
    }

    /// Loads the ledger at `path`, reporting why it cannot be used.
    pub fn try_load(path: &Path) -> Result<Self, LedgerError> {
        let io_err = |source: io::Error| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(io_err)?;
        let timestamp = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(io_err)?;

        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let header = lines.next().ok_or_else(|| LedgerError::Corrupt {
            path: path.to_path_buf(),
            reason: "file is empty".to_string(),
        })?;
        let version = parse_version(header).map_err(|reason| LedgerError::Corrupt {
            path: path.to_path_buf(),
            reason,
        })?;
        let entries: BTreeSet<PathBuf> = lines.map(PathBuf::from).collect();

        tracing::debug!(
            path = %path.display(),
            version,
            entries = entries.len(),
            "loaded ledger"
        );
        Ok(Self {
            version,
            entries,
            timestamp,
        })
    }

    /// Decides whether `module` must be re-evaluated.
    ///
    /// A rebuild is required when the ledger's format version is not current,
    /// when the module directory has no entry, or when the module's
    /// descriptor was modified strictly after the ledger timestamp. A module
    /// whose descriptor no longer exists needs no rebuild.
    pub fn needs_rebuild(&self, module: &Module) -> bool {
        if !self.is_current() || !self.contains(&module.directory) {
            return true;
        }
        let descriptor = &module.descriptor;
        match std::fs::metadata(descriptor).and_then(|m| m.modified()) {
            Ok(modified) => modified > self.timestamp,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::debug!(
                    descriptor = %descriptor.display(),
                    error = %e,
                    "cannot read descriptor mtime; treating module as stale"
                );
                true
            }
        }
    }

    /// Adds `module_dir` to the set of successfully processed modules.
    pub fn record(&mut self, module_dir: &Path) {
        self.entries.insert(module_dir.to_path_buf());
    }

    /// Removes `module_dir` from the ledger. Returns `true` if it was present.
    pub fn forget(&mut self, module_dir: &Path) -> bool {
        self.entries.remove(module_dir)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Writes the ledger to `path`, replacing any previous file.
    ///
    /// Parent directories are created as needed. On success the in-memory
    /// version becomes [`LEDGER_VERSION`] and the timestamp becomes the new
    /// file's modification time.
    ///
    /// An entry that cannot be stored as one line of UTF-8 text is left out
    /// of the file, so that module is rebuilt by the next run.
    pub fn persist(&mut self, path: &Path) -> Result<(), LedgerError> {
        let io_err = |source: io::Error| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut out = format!("{VERSION_PREFIX}{LEDGER_VERSION}\n");
        for entry in &self.entries {
            match entry_line(entry) {
                Some(line) => {
                    out.push_str(line);
                    out.push('\n');
                }
                None => tracing::warn!(
                    entry = %entry.display(),
                    "module directory cannot be stored in the ledger; it will rebuild next run"
                ),
            }
        }
        std::fs::write(path, out).map_err(io_err)?;

        self.version = LEDGER_VERSION;
        self.timestamp = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(io_err)?;
        tracing::debug!(
            path = %path.display(),
            entries = self.entries.len(),
            "persisted ledger"
        );
        Ok(())
    }

    /// Returns `true` if `module_dir` has an entry.
    pub fn contains(&self, module_dir: &Path) -> bool {
        self.entries.contains(module_dir)
    }

    /// Returns `true` if the ledger was written in the current format.
    pub fn is_current(&self) -> bool {
        self.version == LEDGER_VERSION
    }

    /// Returns the format version read from disk.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the baseline timestamp shared by every entry.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Iterates over recorded module directories in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }

    /// Returns the number of recorded modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no module is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StalenessLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the text stored for `entry`, or `None` if reading it back would
/// not yield the same path.
fn entry_line(entry: &Path) -> Option<&str> {
    entry
        .to_str()
        .filter(|s| !s.contains(['\n', '\r']) && s.trim() == *s)
}

fn parse_version(header: &str) -> Result<u32, String> {
    let value = header
        .strip_prefix(VERSION_PREFIX)
        .ok_or_else(|| format!("expected '{VERSION_PREFIX}<n>' header, found '{header}'"))?;
    value
        .trim()
        .parse()
        .map_err(|_| format!("version '{}' is not a number", value.trim()))
}
