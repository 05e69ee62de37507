//! Configuration loading, path resolution, and validation.

use crate::error::ConfigError;
use crate::types::{
    ProjectFile, ToolConfig, DEFAULT_BUILD_DIR, DEFAULT_INTERMEDIATE_DIR, MODULES_SUBDIR,
};
use mbt_common::DescriptorNaming;
use std::path::{Component, Path, PathBuf};

/// Name of the optional project file, looked up in the source directory's parent.
pub const PROJECT_FILE: &str = "mbt.toml";

/// Loads the tool configuration for a source directory.
///
/// Reads `<source_dir>/../mbt.toml` if it exists; otherwise every setting
/// takes its default. The source directory itself is not required to exist.
pub fn load_config(source_dir: &Path) -> Result<ToolConfig, ConfigError> {
    let source = absolute(source_dir)?;
    let project_file = project_root(&source).join(PROJECT_FILE);
    if project_file.is_file() {
        let content = std::fs::read_to_string(&project_file)?;
        load_config_from_str(&source, &content)
    } else {
        resolve(source, ProjectFile::default())
    }
}

/// Parses `mbt.toml` content and resolves it against `source_dir`.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(source_dir: &Path, content: &str) -> Result<ToolConfig, ConfigError> {
    let file: ProjectFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    resolve(absolute(source_dir)?, file)
}

impl ToolConfig {
    /// Builds the default configuration for a source directory, ignoring any project file.
    ///
    /// Build output goes to `<source>/../Build`, intermediates to
    /// `<source>/../Intermediate`, and manifests to `<source>/../Build/Modules`.
    pub fn from_source_dir(source_dir: &Path) -> Result<Self, ConfigError> {
        resolve(absolute(source_dir)?, ProjectFile::default())
    }
}

fn resolve(source_dir: PathBuf, file: ProjectFile) -> Result<ToolConfig, ConfigError> {
    validate(&file)?;

    let root = project_root(&source_dir);
    let build_dir = normalize(&root.join(file.paths.build.as_deref().unwrap_or(DEFAULT_BUILD_DIR)));
    let intermediate_dir = normalize(&root.join(
        file.paths
            .intermediate
            .as_deref()
            .unwrap_or(DEFAULT_INTERMEDIATE_DIR),
    ));
    let build_module_dir = build_dir.join(MODULES_SUBDIR);

    Ok(ToolConfig {
        source_dir,
        build_dir,
        intermediate_dir,
        build_module_dir,
        naming: DescriptorNaming::new(file.descriptor.suffix),
        manifest_extension: file.manifest.extension,
        jobs: file.build.jobs,
    })
}

/// Validates values that deserialize fine but cannot work at run time.
fn validate(file: &ProjectFile) -> Result<(), ConfigError> {
    let suffix = &file.descriptor.suffix;
    if suffix.is_empty() {
        return Err(ConfigError::ValidationError(
            "descriptor.suffix must not be empty".to_string(),
        ));
    }
    if !suffix.starts_with('.') {
        return Err(ConfigError::ValidationError(format!(
            "descriptor.suffix '{suffix}' must start with '.'"
        )));
    }
    let ext = &file.manifest.extension;
    if ext.is_empty() || ext.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "manifest.extension '{ext}' is not a valid file extension"
        )));
    }
    for (key, value) in [
        ("paths.build", &file.paths.build),
        ("paths.intermediate", &file.paths.intermediate),
    ] {
        if matches!(value.as_deref(), Some("")) {
            return Err(ConfigError::ValidationError(format!(
                "{key} must not be empty"
            )));
        }
    }
    Ok(())
}

/// The project root is the parent of the source directory.
fn project_root(source_dir: &Path) -> PathBuf {
    source_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| source_dir.to_path_buf())
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize(&joined))
}

/// Lexically removes `.` components and folds `..` into its parent.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
