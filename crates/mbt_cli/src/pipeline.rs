//! Shared helpers for CLI commands: logging setup, configuration loading,
//! and diagnostic rendering.

use std::path::Path;

use mbt_config::ToolConfig;
use mbt_diagnostics::{Diagnostic, DiagnosticRenderer, JsonRenderer, TerminalRenderer};
use tracing_subscriber::EnvFilter;

use crate::{GlobalArgs, ReportFormat};

/// Returns the log filter used when `RUST_LOG` is not set.
pub fn default_log_level(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Installs the `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `--quiet`/`--verbose`.
pub fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(global)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(global.color)
        .try_init();
}

/// Loads the tool configuration for `source`, honoring `mbt.toml` next to it.
pub fn load_tool_config(source: &Path) -> Result<ToolConfig, Box<dyn std::error::Error>> {
    let config = mbt_config::load_config(source)?;
    tracing::debug!(
        source = %config.source_dir.display(),
        build = %config.build_dir.display(),
        modules = %config.build_module_dir.display(),
        "resolved configuration"
    );
    Ok(config)
}

/// Renders diagnostics to stderr in text mode or as JSON lines to stdout.
///
/// Returns the number of diagnostics rendered.
pub fn render_diagnostics(diagnostics: &[Diagnostic], global: &GlobalArgs) -> usize {
    match global.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in diagnostics {
                eprint!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            for diag in diagnostics {
                println!("{}", JsonRenderer.render(diag));
            }
        }
    }
    diagnostics.len()
}

/// Prints a right-aligned progress line to stderr unless quiet or in JSON mode.
pub fn status(global: &GlobalArgs, verb: &str, message: impl std::fmt::Display) {
    if !global.quiet && global.format == ReportFormat::Text {
        eprintln!("{verb:>12} {message}");
    }
}

#[cfg(test)]
pub(crate) fn quiet_text() -> GlobalArgs {
    GlobalArgs {
        quiet: true,
        verbose: false,
        color: false,
        format: ReportFormat::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbt_diagnostics::DiagnosticCode;
    use std::fs;

    #[test]
    fn log_level_follows_flags() {
        let mut global = quiet_text();
        assert_eq!(default_log_level(&global), "error");
        global.quiet = false;
        assert_eq!(default_log_level(&global), "warn");
        global.verbose = true;
        assert_eq!(default_log_level(&global), "debug");
    }

    #[test]
    fn load_config_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("Source");
        let config = load_tool_config(&source).unwrap();
        assert_eq!(config.build_module_dir, tmp.path().join("Build").join("Modules"));
    }

    #[test]
    fn load_config_reports_bad_project_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("mbt.toml"), "[descriptor]\nsuffix = \"\"\n").unwrap();
        let err = load_tool_config(&tmp.path().join("Source")).unwrap_err();
        assert!(err.to_string().contains("suffix"));
    }

    #[test]
    fn render_counts_diagnostics() {
        let diags = vec![
            Diagnostic::error(DiagnosticCode::DESCRIPTOR_SYNTAX, "expected '='").with_module("Game"),
            Diagnostic::warning(DiagnosticCode::SUBTREE_SKIPPED, "permission denied"),
        ];
        assert_eq!(render_diagnostics(&diags, &quiet_text()), 2);
    }
}
