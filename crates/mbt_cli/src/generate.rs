//! `mbt generate`: evaluate stale modules and write their manifests.
//!
//! 1. Resolve the configuration for the source directory
//! 2. Discover modules and load the staleness ledger
//! 3. Evaluate and write every stale module
//! 4. Persist the ledger and report per-module outcomes

use mbt_build::{BuildContext, BuildError, ModuleOutcome, RunSummary};
use mbt_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use mbt_rules::TomlDescriptorEvaluator;

use crate::pipeline::{load_tool_config, render_diagnostics, status};
use crate::{GenerateArgs, GlobalArgs, ReportFormat, EXIT_FATAL};

/// Runs the `mbt generate` command.
///
/// Returns `0` when every stale module was written, `1` when any module
/// failed, and `2` when the source root or the ledger was unusable.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_tool_config(&args.source.source)?;
    let sink = DiagnosticSink::new();
    let evaluator = TomlDescriptorEvaluator;

    let mut ctx = BuildContext::new(&config, &evaluator, &sink).with_force(args.force);
    if let Some(jobs) = args.jobs {
        ctx = ctx.with_jobs(jobs);
    }

    status(global, "Generating", config.source_dir.display());

    let summary = match mbt_build::generate(&ctx) {
        Ok(summary) => summary,
        Err(BuildError::Discovery(e)) => {
            sink.emit(
                Diagnostic::error(DiagnosticCode::SOURCE_ROOT_UNREADABLE, e.to_string())
                    .with_path(config.source_dir.clone())
                    .with_help("pass the module source root with --source"),
            );
            render_diagnostics(&sink.take_all(), global);
            return Ok(EXIT_FATAL);
        }
    };

    for report in &summary.outcomes {
        match &report.outcome {
            ModuleOutcome::Skipped => {
                if global.verbose {
                    status(global, "Fresh", &report.module.name);
                }
            }
            ModuleOutcome::Built { .. } => status(global, "Wrote", &report.module.name),
            ModuleOutcome::DescriptorFailed { .. } | ModuleOutcome::ManifestFailed { .. } => {
                status(global, "Failed", &report.module.name)
            }
        }
    }

    let report = match global.format {
        ReportFormat::Text => summary_line(&summary, sink.warning_count()),
        ReportFormat::Json => summary_json(&summary, &sink).to_string(),
    };
    let order = summary.outcomes.iter().map(|r| r.module.name.as_str());
    render_diagnostics(&sink.take_in_module_order(order), global);
    match global.format {
        ReportFormat::Text => status(global, "Finished", report),
        ReportFormat::Json => println!("{report}"),
    }

    Ok(summary.exit_code())
}

fn summary_line(summary: &RunSummary, warnings: usize) -> String {
    let mut line = format!(
        "{} written, {} up to date, {} failed",
        summary.built(),
        summary.skipped(),
        summary.failed()
    );
    match warnings {
        0 => {}
        1 => line.push_str(", 1 warning"),
        n => line.push_str(&format!(", {n} warnings")),
    }
    line
}

fn summary_json(summary: &RunSummary, sink: &DiagnosticSink) -> serde_json::Value {
    let modules: Vec<serde_json::Value> = summary
        .outcomes
        .iter()
        .map(|r| {
            let mut entry = serde_json::json!({
                "name": r.module.name,
                "directory": r.module.directory,
            });
            let (state, detail) = match &r.outcome {
                ModuleOutcome::Skipped => ("skipped", None),
                ModuleOutcome::Built { manifest } => {
                    ("built", Some(("manifest", manifest.display().to_string())))
                }
                ModuleOutcome::DescriptorFailed { reason } => {
                    ("descriptor_failed", Some(("reason", reason.clone())))
                }
                ModuleOutcome::ManifestFailed { reason } => {
                    ("manifest_failed", Some(("reason", reason.clone())))
                }
            };
            entry["status"] = state.into();
            if let Some((key, value)) = detail {
                entry[key] = value.into();
            }
            let codes: Vec<String> = sink
                .for_module(&r.module.name)
                .iter()
                .map(|d| d.code.to_string())
                .collect();
            if !codes.is_empty() {
                entry["diagnostics"] = codes.into();
            }
            entry
        })
        .collect();

    serde_json::json!({
        "modules": modules,
        "built": summary.built(),
        "skipped": summary.skipped(),
        "failed": summary.failed(),
        "warnings": sink.warning_count(),
        "skipped_subtrees": sink.count_in(Category::Discovery),
        "worst": sink.worst().map(|s| s.as_str()),
        "ledger_persisted": summary.persisted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::quiet_text;
    use crate::SourceArgs;
    use std::fs;
    use std::path::Path;

    fn args(source: &Path) -> GenerateArgs {
        GenerateArgs {
            source: SourceArgs {
                source: source.to_path_buf(),
            },
            jobs: None,
            force: false,
        }
    }

    fn module(source: &Path, name: &str, text: &str) {
        let dir = source.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.Build.toml")), text).unwrap();
    }

    #[test]
    fn generate_writes_manifests() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("Source");
        module(&source, "Core", "public_include_paths = [\"Public\"]\n");

        let code = run(&args(&source), &quiet_text()).unwrap();
        assert_eq!(code, 0);
        assert!(tmp.path().join("Build/Modules/Core.xml").is_file());
        assert!(tmp.path().join("Build/ModuleBuildTimestamp").is_file());
    }

    #[test]
    fn generate_returns_one_on_module_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("Source");
        module(&source, "Core", "");
        module(&source, "Game", "type = ");

        let code = run(&args(&source), &quiet_text()).unwrap();
        assert_eq!(code, 1);
        assert!(tmp.path().join("Build/Modules/Core.xml").is_file());
        assert!(!tmp.path().join("Build/Modules/Game.xml").exists());
    }

    #[test]
    fn generate_missing_source_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let code = run(&args(&tmp.path().join("Source")), &quiet_text()).unwrap();
        assert_eq!(code, EXIT_FATAL);
        assert!(!tmp.path().join("Build").exists());
    }

    #[test]
    fn generate_with_jobs_and_force() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("Source");
        for name in ["A", "B", "C"] {
            module(&source, name, "");
        }
        let mut a = args(&source);
        a.jobs = Some(2);
        assert_eq!(run(&a, &quiet_text()).unwrap(), 0);

        a.force = true;
        assert_eq!(run(&a, &quiet_text()).unwrap(), 0);
    }

    #[test]
    fn json_summary_shape() {
        let summary = RunSummary {
            outcomes: vec![mbt_build::ModuleReport {
                module: mbt_common::Module::new(
                    "Core",
                    "/s/Core".into(),
                    "/s/Core/Core.Build.toml".into(),
                ),
                outcome: ModuleOutcome::DescriptorFailed {
                    reason: "bad".to_string(),
                },
            }],
            persisted: true,
        };
        let sink = DiagnosticSink::new();
        sink.emit(
            Diagnostic::error(DiagnosticCode::DESCRIPTOR_SYNTAX, "bad").with_module("Core"),
        );
        let json = summary_json(&summary, &sink);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["modules"][0]["status"], "descriptor_failed");
        assert_eq!(json["modules"][0]["reason"], "bad");
        assert_eq!(json["modules"][0]["diagnostics"][0], "E002");
        assert_eq!(json["warnings"], 0);
        assert_eq!(json["skipped_subtrees"], 0);
        assert_eq!(json["worst"], "error");
        assert_eq!(json["ledger_persisted"], true);
    }

    #[test]
    fn summary_line_counts() {
        let summary = RunSummary {
            outcomes: Vec::new(),
            persisted: true,
        };
        assert_eq!(summary_line(&summary, 0), "0 written, 0 up to date, 0 failed");
        assert_eq!(summary_line(&summary, 1), "0 written, 0 up to date, 0 failed, 1 warning");
        assert_eq!(summary_line(&summary, 3), "0 written, 0 up to date, 0 failed, 3 warnings");
    }
}
