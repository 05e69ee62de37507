//! mbt CLI: the command-line interface for the module build tool.
//!
//! Provides `mbt generate` to write dependency manifests for every stale
//! module, `mbt list` to inspect discovery and staleness, `mbt show` to print
//! one module's manifest, and `mbt clean` to remove generated output.

#![warn(missing_docs)]

mod clean;
mod generate;
mod list;
mod pipeline;
mod show;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Exit code for errors that stop a command before it does any work.
pub const EXIT_FATAL: i32 = 2;

/// mbt: discovers modules and generates their dependency manifests.
#[derive(Parser, Debug)]
#[command(name = "mbt", version, about = "Module build tool")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Output format for reports and diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write manifests for every module whose descriptor changed.
    Generate(GenerateArgs),
    /// List discovered modules and whether each is stale.
    List(SourceArgs),
    /// Print the generated manifest of one module.
    Show(ShowArgs),
    /// Delete generated manifests and the staleness ledger.
    Clean(SourceArgs),
}

/// Locates the source tree.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Root directory of the module sources.
    #[arg(short, long, default_value = "Source")]
    pub source: PathBuf,
}

/// Arguments for the `mbt generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source tree location.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Worker threads (`0` = one per CPU). Overrides `[build] jobs`.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Re-evaluate every module, ignoring the staleness ledger.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `mbt show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Source tree location.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Name of the module to show.
    pub module: String,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON on stdout.
    Json,
}

/// Global settings derived from CLI flags.
#[derive(Clone, Debug)]
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Report output format.
    pub format: ReportFormat,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        format: cli.format,
    };

    pipeline::init_logging(&global);

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::List(ref args) => list::run(args, &global),
        Command::Show(ref args) => show::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(EXIT_FATAL);
        }
    }
}
