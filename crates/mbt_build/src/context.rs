//! Everything a run needs, passed explicitly to each stage.

use std::path::PathBuf;

use mbt_cache::LEDGER_FILE;
use mbt_config::ToolConfig;
use mbt_diagnostics::DiagnosticSink;
use mbt_manifest::ManifestWriter;
use mbt_rules::DescriptorEvaluator;

/// Borrowed run settings shared by every module worker.
pub struct BuildContext<'a> {
    /// Resolved tool configuration.
    pub config: &'a ToolConfig,
    /// Turns descriptors into rules.
    pub evaluator: &'a dyn DescriptorEvaluator,
    /// Receives per-module diagnostics.
    pub sink: &'a DiagnosticSink,
    /// Treat every module as stale regardless of the ledger.
    pub force: bool,
    /// Worker threads used for stale modules. `1` runs sequentially.
    pub jobs: usize,
}

impl<'a> BuildContext<'a> {
    /// Creates a context with the worker count taken from the configuration.
    pub fn new(
        config: &'a ToolConfig,
        evaluator: &'a dyn DescriptorEvaluator,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            config,
            evaluator,
            sink,
            force: false,
            jobs: config.effective_jobs(),
        }
    }

    /// Sets whether every module is rebuilt.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Overrides the worker count. `0` means one per available CPU.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = match jobs {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        };
        self
    }

    /// Returns the ledger file location.
    pub fn ledger_path(&self) -> PathBuf {
        self.config.build_dir.join(LEDGER_FILE)
    }

    /// Returns a manifest writer for the configured output directory.
    pub fn manifest_writer(&self) -> ManifestWriter {
        ManifestWriter::new(
            self.config.build_module_dir.clone(),
            self.config.manifest_extension.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbt_rules::TomlDescriptorEvaluator;
    use std::path::Path;

    #[test]
    fn paths_follow_config() {
        let config = ToolConfig::from_source_dir(Path::new("/p/Source")).unwrap();
        let sink = DiagnosticSink::new();
        let ctx = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink);
        assert_eq!(ctx.ledger_path(), PathBuf::from("/p/Build/ModuleBuildTimestamp"));
        assert_eq!(ctx.manifest_writer().path_for("Core"), PathBuf::from("/p/Build/Modules/Core.xml"));
        assert!(!ctx.force);
        assert_eq!(ctx.jobs, 1);
    }

    #[test]
    fn builder_overrides() {
        let config = ToolConfig::from_source_dir(Path::new("/p/Source")).unwrap();
        let sink = DiagnosticSink::new();
        let ctx = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink)
            .with_force(true)
            .with_jobs(3);
        assert!(ctx.force);
        assert_eq!(ctx.jobs, 3);

        let auto = BuildContext::new(&config, &TomlDescriptorEvaluator, &sink).with_jobs(0);
        assert!(auto.jobs >= 1);
    }
}
