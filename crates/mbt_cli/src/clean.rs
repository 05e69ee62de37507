//! `mbt clean`: remove generated manifests and the staleness ledger.

use std::path::Path;

use crate::pipeline::{load_tool_config, status};
use crate::{GlobalArgs, SourceArgs};

/// Runs the `mbt clean` command. Missing outputs are not an error.
pub fn run(args: &SourceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_tool_config(&args.source)?;

    if remove(&config.build_module_dir, true)? {
        status(global, "Removed", config.build_module_dir.display());
    }
    let ledger = config.build_dir.join(mbt_cache::LEDGER_FILE);
    if remove(&ledger, false)? {
        status(global, "Removed", ledger.display());
    }
    Ok(0)
}

/// Deletes `path` if it exists. Returns whether anything was removed.
fn remove(path: &Path, dir: bool) -> std::io::Result<bool> {
    let result = if dir {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::quiet_text;
    use std::fs;

    #[test]
    fn clean_removes_outputs_but_keeps_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("Source");
        fs::create_dir_all(source.join("Core")).unwrap();
        fs::write(source.join("Core/Core.Build.toml"), "").unwrap();
        fs::create_dir_all(tmp.path().join("Build/Modules")).unwrap();
        fs::write(tmp.path().join("Build/Modules/Core.xml"), "<Module/>").unwrap();
        fs::write(tmp.path().join("Build/ModuleBuildTimestamp"), "Version: 1\n").unwrap();

        let args = SourceArgs {
            source: source.clone(),
        };
        assert_eq!(run(&args, &quiet_text()).unwrap(), 0);
        assert!(!tmp.path().join("Build/Modules").exists());
        assert!(!tmp.path().join("Build/ModuleBuildTimestamp").exists());
        assert!(source.join("Core/Core.Build.toml").is_file());
    }

    #[test]
    fn clean_without_outputs_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        let args = SourceArgs {
            source: tmp.path().join("Source"),
        };
        assert_eq!(run(&args, &quiet_text()).unwrap(), 0);
    }
}
