//! Descriptor evaluation: one TOML file in, one [`ModuleRules`] out.
//!
//! A descriptor looks like:
//!
//! ```toml
//! type = "Runtime"
//! public_dependencies = ["Core"]
//! private_dependencies = ["Sockets"]
//! public_include_paths = ["Public"]
//! private_include_paths = ["Private"]
//! ```
//!
//! Every key is optional; an empty file yields [`ModuleRules::default`].
//! Evaluation needs nothing but the file's own text, so modules never depend
//! on knowledge of their siblings.

use std::collections::HashSet;
use std::path::Path;

use mbt_common::Module;
use serde::Deserialize;

use crate::error::DescriptorError;
use crate::rules::{ModuleKind, ModuleRules};

/// Turns a module's descriptor into rules.
///
/// Implementations must be deterministic: evaluating an unchanged descriptor
/// twice yields equal rules. They are shared across worker threads.
pub trait DescriptorEvaluator: Send + Sync {
    /// Evaluates the descriptor of `module`.
    fn evaluate(&self, module: &Module) -> Result<ModuleRules, DescriptorError>;
}

/// Evaluates declarative TOML descriptors read from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlDescriptorEvaluator;

impl DescriptorEvaluator for TomlDescriptorEvaluator {
    fn evaluate(&self, module: &Module) -> Result<ModuleRules, DescriptorError> {
        let text = std::fs::read_to_string(&module.descriptor).map_err(|e| DescriptorError::Io {
            path: module.descriptor.clone(),
            source: e,
        })?;
        evaluate_str(&module.name, &text)
    }
}

/// The raw descriptor shape before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    #[serde(default)]
    public_dependencies: Vec<String>,
    #[serde(default)]
    private_dependencies: Vec<String>,
    #[serde(default)]
    public_include_paths: Vec<String>,
    #[serde(default)]
    private_include_paths: Vec<String>,
}

/// Evaluates descriptor text for the module named `module_name`.
pub fn evaluate_str(module_name: &str, text: &str) -> Result<ModuleRules, DescriptorError> {
    let table: toml::Table = text.parse().map_err(|e: toml::de::Error| DescriptorError::Syntax {
        module: module_name.to_string(),
        message: e.message().to_string(),
    })?;
    let raw: RawDescriptor = toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| DescriptorError::invalid(module_name, e.message()))?;

    if let Some(declared) = &raw.name {
        if declared != module_name {
            return Err(DescriptorError::invalid(
                module_name,
                format!("descriptor declares name '{declared}' but lives in module '{module_name}'"),
            ));
        }
    }

    let kind = match &raw.kind {
        Some(s) => s
            .parse::<ModuleKind>()
            .map_err(|e| DescriptorError::invalid(module_name, e.to_string()))?,
        None => ModuleKind::default(),
    };

    for dep in raw.public_dependencies.iter().chain(&raw.private_dependencies) {
        validate_dependency(module_name, dep)?;
    }
    for path in raw
        .public_include_paths
        .iter()
        .chain(&raw.private_include_paths)
    {
        validate_include_path(module_name, path)?;
    }

    let public_dependency_names = unique(module_name, "public_dependencies", raw.public_dependencies);
    let private_dependency_names: Vec<String> =
        unique(module_name, "private_dependencies", raw.private_dependencies)
            .into_iter()
            .filter(|dep| {
                let shadowed = public_dependency_names.contains(dep);
                if shadowed {
                    tracing::warn!(
                        module = module_name,
                        dependency = %dep,
                        "dependency is declared public and private; keeping it public"
                    );
                }
                !shadowed
            })
            .collect();

    Ok(ModuleRules {
        kind,
        public_dependency_names,
        private_dependency_names,
        public_include_paths: unique(module_name, "public_include_paths", raw.public_include_paths),
        private_include_paths: unique(
            module_name,
            "private_include_paths",
            raw.private_include_paths,
        ),
    })
}

fn validate_dependency(module_name: &str, dep: &str) -> Result<(), DescriptorError> {
    if dep.is_empty() {
        return Err(DescriptorError::invalid(module_name, "empty dependency name"));
    }
    if dep
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\\')
    {
        return Err(DescriptorError::invalid(
            module_name,
            format!("dependency '{dep}' is not a module name"),
        ));
    }
    if dep == module_name {
        return Err(DescriptorError::invalid(
            module_name,
            "module cannot depend on itself",
        ));
    }
    Ok(())
}

fn validate_include_path(module_name: &str, path: &str) -> Result<(), DescriptorError> {
    if path.trim().is_empty() {
        return Err(DescriptorError::invalid(module_name, "empty include path"));
    }
    if path.trim() != path {
        return Err(DescriptorError::invalid(
            module_name,
            format!("include path '{path}' has leading or trailing whitespace"),
        ));
    }
    if Path::new(path).is_absolute() || path.starts_with('/') || path.starts_with('\\') {
        return Err(DescriptorError::invalid(
            module_name,
            format!("include path '{path}' must be relative to the module"),
        ));
    }
    Ok(())
}

/// Drops repeated entries, keeping the first occurrence of each.
fn unique(module_name: &str, list: &str, values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|v| {
            let first = seen.insert(v.clone());
            if !first {
                tracing::warn!(module = module_name, list, entry = %v, "dropping duplicate entry");
            }
            first
        })
        .collect()
}
