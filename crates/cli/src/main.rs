//! apexctl - ApexCoach command-line interface
//!
//! Corner analysis of raw lap telemetry, driver comparisons with coaching
//! advice, what-if projections and standings over precomputed datasets.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use anyhow::{Context, Result};
use apexcoach_telemetry_config::{AnalysisConfig, load_config_file, load_default_config};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CommandEnv, Commands};

#[derive(Parser, Debug)]
#[command(name = "apexctl")]
#[command(about = "ApexCoach CLI - Corner analysis and driver coaching from race telemetry")]
#[command(version)]
#[command(long_about = "
apexctl segments laps into corners, compares drivers corner by corner and
turns the differences into coaching advice.

Raw telemetry is read from long-format CSV files; comparisons, standings and
projections run over a directory of precomputed dataset tables.
Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Analysis configuration (YAML), replacing the built-in defaults
    #[arg(long, global = true, env = "APEXCOACH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => load_config_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(load_default_config()?),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let env = CommandEnv {
        json: cli.json,
        config: load_config(cli.config.as_ref())?,
    };
    commands::execute(&cli.command, &env)
}
