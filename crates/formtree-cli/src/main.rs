//! # formtree CLI Entry Point
//!
//! Parses arguments, installs the tracing subscriber and dispatches to the
//! subcommand handlers in the `formtree_cli` library.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use formtree_cli::merge::{run_merge, MergeArgs};
use formtree_cli::validate::{run_validate, ValidateArgs};

/// formtree: schema-driven validation of JSON and YAML documents.
///
/// Builds a live node tree from a JSON-Schema-like configuration,
/// validates documents against it and reports findings per field.
#[derive(Parser, Debug)]
#[command(name = "formtree", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a data document against a schema.
    Validate(ValidateArgs),
    /// Merge metadata and value overlays into a schema.
    Merge(MergeArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Merge(args) => run_merge(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
