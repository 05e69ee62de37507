//! The per-module build loop.

use rayon::prelude::*;

use mbt_cache::StalenessLedger;
use mbt_common::Module;
use mbt_diagnostics::{Diagnostic, DiagnosticCode};
use mbt_manifest::ManifestWriter;

use crate::context::BuildContext;
use crate::diagnostics::{descriptor_diagnostic, manifest_diagnostic, skipped_diagnostic};
use crate::error::BuildError;
use crate::outcome::{ModuleOutcome, ModuleReport, RunSummary};

/// Discovers modules, loads the ledger, and runs every module.
///
/// Fails only if the source root cannot be scanned; in that case nothing is
/// evaluated, written, or persisted.
pub fn generate(ctx: &BuildContext<'_>) -> Result<RunSummary, BuildError> {
    let config = ctx.config;
    let discovery = mbt_discovery::scan(&config.source_dir, &config.naming)?;
    for skipped in &discovery.skipped {
        ctx.sink.emit(skipped_diagnostic(skipped));
    }

    let mut ledger = load_ledger(ctx);
    Ok(run(&discovery.modules, &mut ledger, ctx))
}

/// Processes `modules` in order and persists `ledger` once at the end.
///
/// Staleness is decided for every module against the ledger as loaded,
/// before any work starts. Stale modules are evaluated and written, in
/// parallel when `ctx.jobs > 1`. Successful modules are recorded in
/// discovery order; failed ones are reported to the sink and removed from
/// the ledger so the next run retries them. The ledger is persisted even
/// when some modules failed.
pub fn run(
    modules: &[Module],
    ledger: &mut StalenessLedger,
    ctx: &BuildContext<'_>,
) -> RunSummary {
    let stale: Vec<bool> = modules
        .iter()
        .map(|m| ctx.force || ledger.needs_rebuild(m))
        .collect();
    let candidates: Vec<&Module> = modules
        .iter()
        .zip(&stale)
        .filter_map(|(m, &s)| s.then_some(m))
        .collect();

    tracing::info!(
        modules = modules.len(),
        stale = candidates.len(),
        jobs = ctx.jobs,
        "processing modules"
    );

    let writer = ctx.manifest_writer();
    let mut built = process_all(&candidates, ctx, &writer).into_iter();

    let mut outcomes = Vec::with_capacity(modules.len());
    for (module, &is_stale) in modules.iter().zip(&stale) {
        let outcome = if is_stale {
            built.next().unwrap_or(ModuleOutcome::Skipped)
        } else {
            tracing::debug!(module = %module.name, "up to date");
            ModuleOutcome::Skipped
        };
        if matches!(outcome, ModuleOutcome::Built { .. }) {
            ledger.record(&module.directory);
        } else if outcome.is_failure() && ledger.forget(&module.directory) {
            tracing::debug!(module = %module.name, "dropped ledger entry of failed module");
        }
        outcomes.push(ModuleReport {
            module: module.clone(),
            outcome,
        });
    }

    let ledger_path = ctx.ledger_path();
    let persisted = match ledger.persist(&ledger_path) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "failed to persist ledger");
            ctx.sink.emit(
                Diagnostic::error(DiagnosticCode::LEDGER_PERSIST, e.to_string())
                    .with_path(ledger_path)
                    .with_note("every module will be re-evaluated on the next run"),
            );
            false
        }
    };

    RunSummary {
        outcomes,
        persisted,
    }
}

/// Runs `candidates` sequentially or on a bounded pool, preserving order.
fn process_all(
    candidates: &[&Module],
    ctx: &BuildContext<'_>,
    writer: &ManifestWriter,
) -> Vec<ModuleOutcome> {
    if ctx.jobs > 1 && candidates.len() > 1 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(ctx.jobs)
            .build()
        {
            Ok(pool) => {
                return pool.install(|| {
                    candidates
                        .par_iter()
                        .map(|m| process_module(m, ctx, writer))
                        .collect()
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot start worker pool; running sequentially");
            }
        }
    }
    candidates
        .iter()
        .map(|m| process_module(m, ctx, writer))
        .collect()
}

/// Evaluates one module and writes its manifest.
fn process_module(
    module: &Module,
    ctx: &BuildContext<'_>,
    writer: &ManifestWriter,
) -> ModuleOutcome {
    tracing::info!(module = %module.name, "evaluating descriptor");
    let rules = match ctx.evaluator.evaluate(module) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::warn!(module = %module.name, error = %e, "descriptor evaluation failed");
            ctx.sink.emit(descriptor_diagnostic(module, &e));
            return ModuleOutcome::DescriptorFailed {
                reason: e.to_string(),
            };
        }
    };

    match writer.write(&rules, &module.name) {
        Ok(manifest) => {
            tracing::debug!(
                module = %module.name,
                manifest = %manifest.display(),
                "manifest written"
            );
            ModuleOutcome::Built { manifest }
        }
        Err(e) => {
            tracing::warn!(module = %module.name, error = %e, "manifest write failed");
            ctx.sink.emit(manifest_diagnostic(module, &e));
            ModuleOutcome::ManifestFailed {
                reason: e.to_string(),
            }
        }
    }
}

/// Loads the ledger, reporting a discarded file as a warning.
fn load_ledger(ctx: &BuildContext<'_>) -> StalenessLedger {
    let path = ctx.ledger_path();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no ledger; every module is stale");
        return StalenessLedger::new();
    }
    match StalenessLedger::try_load(&path) {
        Ok(ledger) => ledger,
        Err(e) => {
            tracing::warn!(error = %e, "discarding ledger");
            ctx.sink.emit(
                Diagnostic::warning(DiagnosticCode::LEDGER_DISCARDED, e.to_string())
                    .with_path(path)
                    .with_note("all modules will be re-evaluated"),
            );
            StalenessLedger::discarded()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbt_config::ToolConfig;
    use mbt_diagnostics::DiagnosticSink;
    use mbt_rules::{DescriptorError, ModuleRules, TomlDescriptorEvaluator};
    use std::fs;
    use std::path::Path;

    /// Always fails with a syntax error.
    struct Broken;

    impl mbt_rules::DescriptorEvaluator for Broken {
        fn evaluate(&self, module: &Module) -> Result<ModuleRules, DescriptorError> {
            Err(DescriptorError::Syntax {
                module: module.name.clone(),
                message: "expected '='".to_string(),
            })
        }
    }

    fn project() -> (tempfile::TempDir, ToolConfig) {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("Source");
        fs::create_dir_all(&source).unwrap();
        let config = ToolConfig::from_source_dir(&source).unwrap();
        (tmp, config)
    }

    fn add_module(config: &ToolConfig, name: &str, text: &str) -> Module {
        let dir = config.source_dir.join(name);
        fs::create_dir_all(&dir).unwrap();
        let descriptor = dir.join(format!("{name}.Build.toml"));
        fs::write(&descriptor, text).unwrap();
        Module::new(name, dir, descriptor)
    }

    #[test]
    fn builds_and_records_stale_modules() {
        let (_tmp, config) = project();
        let core = add_module(&config, "Core", "public_include_paths = [\"Public\"]\n");
        let sink = DiagnosticSink::new();
        let ctx = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink);
        let mut ledger = StalenessLedger::new();

        let summary = run(&[core.clone()], &mut ledger, &ctx);
        assert_eq!(summary.built(), 1);
        assert!(summary.persisted);
        assert!(ledger.contains(&core.directory));
        assert!(config.build_module_dir.join("Core.xml").is_file());
        assert!(ctx.ledger_path().is_file());
    }

    #[test]
    fn descriptor_failure_is_reported_not_recorded() {
        let (_tmp, config) = project();
        let game = add_module(&config, "Game", "");
        let sink = DiagnosticSink::new();
        let ctx = BuildContext::new(&config, &Broken, &sink);
        let mut ledger = StalenessLedger::new();

        let summary = run(&[game.clone()], &mut ledger, &ctx);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.exit_code(), 1);
        assert!(!ledger.contains(&game.directory));
        assert!(!config.build_module_dir.join("Game.xml").exists());

        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::DESCRIPTOR_SYNTAX);
        assert_eq!(diags[0].module.as_deref(), Some("Game"));
        assert_eq!(diags[0].path.as_deref(), Some(game.descriptor.as_path()));
    }

    #[test]
    fn failure_drops_earlier_ledger_entry() {
        let (_tmp, config) = project();
        let core = add_module(&config, "Core", "");
        let sink = DiagnosticSink::new();
        let mut ledger = StalenessLedger::new();

        let ok = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink);
        assert_eq!(run(&[core.clone()], &mut ledger, &ok).built(), 1);
        assert!(ledger.contains(&core.directory));

        let broken = BuildContext::new(&config, &Broken, &sink).with_force(true);
        assert_eq!(run(&[core.clone()], &mut ledger, &broken).failed(), 1);
        assert!(!ledger.contains(&core.directory));

        let reloaded = StalenessLedger::load(&ok.ledger_path());
        assert!(reloaded.needs_rebuild(&core));
    }

    #[test]
    fn manifest_failure_is_distinct() {
        let (_tmp, config) = project();
        let core = add_module(&config, "Core", "");
        fs::create_dir_all(&config.build_dir).unwrap();
        fs::write(&config.build_module_dir, "not a directory").unwrap();
        let sink = DiagnosticSink::new();
        let ctx = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink);
        let mut ledger = StalenessLedger::new();

        let summary = run(&[core.clone()], &mut ledger, &ctx);
        assert!(matches!(
            summary.report("Core").map(|r| &r.outcome),
            Some(ModuleOutcome::ManifestFailed { .. })
        ));
        assert!(!ledger.contains(&core.directory));
        assert_eq!(sink.diagnostics()[0].code, DiagnosticCode::MANIFEST_WRITE);
    }

    #[test]
    fn persist_failure_sets_fatal_exit_code() {
        let (tmp, _) = project();
        let source = tmp.path().join("Source");
        let config = mbt_config::load_config_from_str(
            &source,
            "[paths]\nbuild = \"Blocked\"\n",
        )
        .unwrap();
        fs::write(tmp.path().join("Blocked"), "file").unwrap();
        let sink = DiagnosticSink::new();
        let ctx = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink);
        let mut ledger = StalenessLedger::new();

        let summary = run(&[], &mut ledger, &ctx);
        assert!(!summary.persisted);
        assert_eq!(summary.exit_code(), 2);
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| d.code == DiagnosticCode::LEDGER_PERSIST));
    }

    #[test]
    fn force_rebuilds_fresh_modules() {
        let (_tmp, config) = project();
        let core = add_module(&config, "Core", "");
        let sink = DiagnosticSink::new();
        let mut ledger = StalenessLedger::new();

        let ctx = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink);
        assert_eq!(run(&[core.clone()], &mut ledger, &ctx).built(), 1);
        assert_eq!(run(&[core.clone()], &mut ledger, &ctx).skipped(), 1);

        let forced = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink).with_force(true);
        assert_eq!(run(&[core], &mut ledger, &forced).built(), 1);
    }

    #[test]
    fn generate_reports_missing_source_root() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ToolConfig::from_source_dir(&tmp.path().join("Missing")).unwrap();
        let sink = DiagnosticSink::new();
        let ctx = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink);

        let err = generate(&ctx).unwrap_err();
        assert!(matches!(err, BuildError::Discovery(_)));
        assert!(!ctx.ledger_path().exists());
    }

    #[test]
    fn generate_discards_corrupt_ledger() {
        let (_tmp, config) = project();
        add_module(&config, "Core", "");
        fs::create_dir_all(&config.build_dir).unwrap();
        fs::write(config.build_dir.join("ModuleBuildTimestamp"), "garbage\n").unwrap();
        let sink = DiagnosticSink::new();
        let ctx = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink);

        let summary = generate(&ctx).unwrap();
        assert_eq!(summary.built(), 1);
        assert_eq!(summary.exit_code(), 0);
        let diags = sink.diagnostics();
        assert_eq!(diags[0].code, DiagnosticCode::LEDGER_DISCARDED);
        assert!(!sink.has_errors());

        let text = fs::read_to_string(ctx.ledger_path()).unwrap();
        assert!(text.starts_with("Version: 1\n"));
    }

    #[test]
    fn outcomes_follow_discovery_order_in_parallel() {
        let (_tmp, config) = project();
        let names = ["A", "B", "C", "D", "E", "F"];
        let modules: Vec<Module> = names
            .iter()
            .map(|n| add_module(&config, n, ""))
            .collect();
        let sink = DiagnosticSink::new();
        let ctx = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink).with_jobs(4);
        let mut ledger = StalenessLedger::new();

        let summary = run(&modules, &mut ledger, &ctx);
        let order: Vec<&str> = summary
            .outcomes
            .iter()
            .map(|r| r.module.name.as_str())
            .collect();
        assert_eq!(order, names);
        assert_eq!(summary.built(), names.len());
        for m in &modules {
            assert!(ledger.contains(Path::new(&m.directory)));
        }
    }
}
