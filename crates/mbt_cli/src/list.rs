//! `mbt list`: show discovered modules and their staleness.

use mbt_build::skipped_diagnostic;
use mbt_cache::StalenessLedger;
use mbt_diagnostics::Diagnostic;

use crate::pipeline::{load_tool_config, render_diagnostics};
use crate::{GlobalArgs, ReportFormat, SourceArgs};

/// One row of the listing.
struct Row {
    name: String,
    descriptor: String,
    stale: bool,
}

/// Runs the `mbt list` command. Nothing is evaluated or written.
pub fn run(args: &SourceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_tool_config(&args.source)?;
    let discovery = mbt_discovery::scan(&config.source_dir, &config.naming)?;
    let ledger = StalenessLedger::load(&config.build_dir.join(mbt_cache::LEDGER_FILE));

    let rows: Vec<Row> = discovery
        .modules
        .iter()
        .map(|m| Row {
            name: m.name.clone(),
            descriptor: m.descriptor.display().to_string(),
            stale: ledger.needs_rebuild(m),
        })
        .collect();

    let skipped: Vec<Diagnostic> = discovery.skipped.iter().map(skipped_diagnostic).collect();
    render_diagnostics(&skipped, global);

    match global.format {
        ReportFormat::Text => print!("{}", render_table(&rows)),
        ReportFormat::Json => println!("{}", render_json(&rows)),
    }
    Ok(0)
}

fn render_table(rows: &[Row]) -> String {
    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        let state = if row.stale { "stale" } else { "fresh" };
        out.push_str(&format!("{:<width$}  {state}  {}\n", row.name, row.descriptor));
    }
    out
}

fn render_json(rows: &[Row]) -> serde_json::Value {
    rows.iter()
        .map(|r| {
            serde_json::json!({
                "name": r.name,
                "descriptor": r.descriptor,
                "stale": r.stale,
            })
        })
        .collect()
}
