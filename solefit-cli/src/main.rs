//! SoleFit diagnostics CLI.
//!
//! Exercises the engine components from the command line: capability
//! probing, model fetching, hand-off link generation, and a synthetic
//! performance report.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use solefit::AppConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "solefit", version, about = "AR shoe try-on engine diagnostics")]
struct Cli {
    /// Path to an INI configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe a client environment and print the capability report.
    Probe(commands::probe::ProbeArgs),
    /// Load a model through the cache and print the entry summary.
    Fetch(commands::fetch::FetchArgs),
    /// Print AR hand-off links for a model.
    Handoff(commands::handoff::HandoffArgs),
    /// Run a synthetic frame loop and print the telemetry report.
    Report(commands::report::ReportArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match AppConfig::from_ini_file(path) {
            Ok(config) => config,
            Err(err) => {
                error!(error = %err, "failed to load configuration");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    let result = match cli.command {
        Command::Probe(args) => commands::probe::run(args),
        Command::Fetch(args) => commands::fetch::run(args, &config).await,
        Command::Handoff(args) => commands::handoff::run(args, &config),
        Command::Report(args) => commands::report::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}
