//! `mbt show`: print one module's generated manifest.

use mbt_manifest::{manifest_path, read_manifest, ManifestError};
use mbt_rules::ModuleRules;

use crate::pipeline::load_tool_config;
use crate::{GlobalArgs, ReportFormat, ShowArgs};

/// Runs the `mbt show` command.
pub fn run(args: &ShowArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_tool_config(&args.source.source)?;
    let path = manifest_path(
        &config.build_module_dir,
        &args.module,
        &config.manifest_extension,
    );

    let rules = match read_manifest(&path) {
        Ok(rules) => rules,
        Err(ManifestError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(format!(
                "no manifest for module '{}' at {}; run `mbt generate` first",
                args.module,
                path.display()
            )
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    match global.format {
        ReportFormat::Text => print!("{}", describe(&args.module, &rules)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&rules)?),
    }
    Ok(0)
}

fn describe(name: &str, rules: &ModuleRules) -> String {
    let mut out = format!("{name} ({})\n", rules.kind);
    for (label, items) in [
        ("public dependencies", &rules.public_dependency_names),
        ("private dependencies", &rules.private_dependency_names),
        ("public include paths", &rules.public_include_paths),
        ("private include paths", &rules.private_include_paths),
    ] {
        if items.is_empty() {
            out.push_str(&format!("  {label}: (none)\n"));
        } else {
            out.push_str(&format!("  {label}: {}\n", items.join(", ")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::quiet_text;
    use crate::SourceArgs;
    use mbt_rules::ModuleKind;

    #[test]
    fn describe_lists_every_field() {
        let rules = ModuleRules {
            kind: ModuleKind::Editor,
            public_dependency_names: vec!["Core".to_string(), "XML".to_string()],
            ..ModuleRules::default()
        };
        let text = describe("EditorMain", &rules);
        assert!(text.starts_with("EditorMain (Editor)\n"));
        assert!(text.contains("  public dependencies: Core, XML\n"));
        assert!(text.contains("  private include paths: (none)\n"));
    }

    #[test]
    fn show_reads_written_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("Source");
        let modules = tmp.path().join("Build/Modules");
        mbt_manifest::write_manifest(&ModuleRules::default(), "Core", &modules).unwrap();

        let args = ShowArgs {
            source: SourceArgs { source },
            module: "Core".to_string(),
        };
        assert_eq!(run(&args, &quiet_text()).unwrap(), 0);
    }

    #[test]
    fn show_missing_manifest_explains() {
        let tmp = tempfile::tempdir().unwrap();
        let args = ShowArgs {
            source: SourceArgs {
                source: tmp.path().join("Source"),
            },
            module: "Ghost".to_string(),
        };
        let err = run(&args, &quiet_text()).unwrap_err();
        assert!(err.to_string().contains("run `mbt generate` first"));
    }
}
