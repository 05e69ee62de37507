//! Diagnostics for per-module and per-directory problems.
//!
//! `mbt generate` and `mbt list` both report skipped subtrees, so the
//! constructors live here rather than at each call site.

use mbt_common::Module;
use mbt_diagnostics::{Diagnostic, DiagnosticCode};
use mbt_discovery::SkippedDir;
use mbt_manifest::ManifestError;
use mbt_rules::DescriptorError;

/// Builds the error reported when a module's descriptor cannot be evaluated.
pub fn descriptor_diagnostic(module: &Module, err: &DescriptorError) -> Diagnostic {
    let code = match err {
        DescriptorError::Io { .. } => DiagnosticCode::DESCRIPTOR_UNREADABLE,
        DescriptorError::Syntax { .. } => DiagnosticCode::DESCRIPTOR_SYNTAX,
        DescriptorError::Invalid { .. } => DiagnosticCode::DESCRIPTOR_INVALID,
    };
    Diagnostic::error(code, err.to_string())
        .with_module(module.name.clone())
        .with_path(module.descriptor.clone())
        .with_help("fix the descriptor; the module is retried on the next run")
}

/// Builds the error reported when a module's manifest cannot be written.
pub fn manifest_diagnostic(module: &Module, err: &ManifestError) -> Diagnostic {
    let diag = Diagnostic::error(DiagnosticCode::MANIFEST_WRITE, err.to_string())
        .with_module(module.name.clone());
    match err {
        ManifestError::Io { path, .. } => diag.with_path(path.clone()),
        _ => diag,
    }
}

/// Builds the warning for a subtree that discovery could not search.
pub fn skipped_diagnostic(skipped: &SkippedDir) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticCode::SUBTREE_SKIPPED,
        format!("directory skipped: {}", skipped.reason),
    )
    .with_path(skipped.path.clone())
    .with_note("modules below this directory were not discovered")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbt_diagnostics::Severity;
    use std::path::PathBuf;

    fn core() -> Module {
        Module::new(
            "Core",
            PathBuf::from("/s/Core"),
            PathBuf::from("/s/Core/Core.Build.toml"),
        )
    }

    #[test]
    fn descriptor_codes_follow_error_kind() {
        let invalid = DescriptorError::Invalid {
            module: "Core".to_string(),
            reason: "bad kind".to_string(),
        };
        let diag = descriptor_diagnostic(&core(), &invalid);
        assert_eq!(diag.code, DiagnosticCode::DESCRIPTOR_INVALID);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.module.as_deref(), Some("Core"));
        assert_eq!(diag.path, Some(PathBuf::from("/s/Core/Core.Build.toml")));
    }

    #[test]
    fn skipped_subtree_is_a_warning_with_path() {
        let skipped = SkippedDir {
            path: PathBuf::from("/s/Locked"),
            reason: "permission denied".to_string(),
        };
        let diag = skipped_diagnostic(&skipped);
        assert_eq!(diag.code, DiagnosticCode::SUBTREE_SKIPPED);
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.message, "directory skipped: permission denied");
        assert_eq!(diag.path, Some(PathBuf::from("/s/Locked")));
        assert_eq!(diag.notes.len(), 1);
    }
}
