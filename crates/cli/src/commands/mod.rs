//! Command implementations for apexctl

pub mod compare;
pub mod corners;
pub mod demo;
pub mod multi;
pub mod standings;
pub mod what_if;

use crate::error::CliError;
use anyhow::{Context, Result};
use apexcoach_coaching::{Benchmark, CornerRange, default_corner_range};
use apexcoach_datasets::Datasets;
use apexcoach_telemetry_config::AnalysisConfig;
use apexcoach_telemetry_core::ComparisonRecord;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// State shared by every command.
#[derive(Debug)]
pub struct CommandEnv {
    pub json: bool,
    pub config: AnalysisConfig,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect corners and extract corner features from one lap of raw telemetry
    Corners(CornersArgs),

    /// Compare a driver against a benchmark corner by corner, with coaching
    Compare(CompareArgs),

    /// Project a lap time from an improvement percentage
    WhatIf(WhatIfArgs),

    /// Dataset summary, leader, driver standings and top model features
    Standings(StandingsArgs),

    /// Time loss of several drivers against one benchmark
    Multi(MultiArgs),

    /// Run the full pipeline over synthetic laps
    Demo(DemoArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CornersArgs {
    /// Raw long-format telemetry CSV
    #[arg(long)]
    pub telemetry: PathBuf,
    /// Vehicle id of the lap
    #[arg(long)]
    pub vehicle: String,
    /// Lap number
    #[arg(long)]
    pub lap: u32,
    /// Track profile used to check the corner count
    #[arg(long)]
    pub track: Option<String>,
    /// Throttle threshold below which a corner starts (0-100)
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Minimum corner length in samples
    #[arg(long)]
    pub min_length: Option<usize>,
}

/// Directory holding the precomputed CSV tables.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    #[arg(long, env = "APEXCOACH_DATA")]
    pub data: PathBuf,
}

#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeArgs {
    /// First corner of the range
    #[arg(long)]
    pub from: Option<u32>,
    /// Last corner of the range
    #[arg(long)]
    pub to: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Driver to coach
    #[arg(long)]
    pub driver: String,
    /// Reference driver (defaults to the fastest driver)
    #[arg(long)]
    pub benchmark: Option<String>,
    #[arg(long)]
    pub track: Option<String>,
    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args, Debug, Clone)]
pub struct WhatIfArgs {
    #[command(flatten)]
    pub data: DataArgs,
    #[arg(long)]
    pub driver: String,
    #[arg(long)]
    pub track: Option<String>,
    /// Improvement in percent (0-25)
    #[arg(long)]
    pub improvement: f64,
}

#[derive(Args, Debug, Clone)]
pub struct StandingsArgs {
    #[command(flatten)]
    pub data: DataArgs,
    #[arg(long)]
    pub track: Option<String>,
    /// Number of model features to list
    #[arg(long, default_value_t = apexcoach_coaching::DEFAULT_TOP_FEATURES)]
    pub top: usize,
}

#[derive(Args, Debug, Clone)]
pub struct MultiArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Comma-separated driver ids
    #[arg(long, value_delimiter = ',', required = true)]
    pub drivers: Vec<String>,
    /// Reference driver (defaults to the fastest driver)
    #[arg(long)]
    pub benchmark: Option<String>,
    #[arg(long)]
    pub track: Option<String>,
    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct DemoArgs {
    /// Improvement used for the what-if projection (0-25)
    #[arg(long, default_value_t = 5.0)]
    pub improvement: f64,
}

impl RangeArgs {
    /// The range given on the command line, if any. A missing bound takes
    /// its value from the default range.
    pub fn explicit(&self) -> Result<Option<CornerRange>, CliError> {
        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        let range = CornerRange::new(
            self.from.unwrap_or(CornerRange::DEFAULT_LOW),
            self.to.unwrap_or(CornerRange::DEFAULT_HIGH),
        );
        if range.is_empty() {
            return Err(CliError::InvalidArgument(format!(
                "corner range {range} is empty, --from must not exceed --to"
            )));
        }
        Ok(Some(range))
    }

    /// The explicit range, or the span of the pair's precomputed comparisons.
    pub fn resolve(
        &self,
        comparisons: &[ComparisonRecord],
        slow: &str,
        fast: &str,
        track: Option<&str>,
    ) -> Result<CornerRange, CliError> {
        Ok(self
            .explicit()?
            .unwrap_or_else(|| default_corner_range(comparisons, slow, fast, track)))
    }
}

pub fn execute(cmd: &Commands, env: &CommandEnv) -> Result<()> {
    match cmd {
        Commands::Corners(args) => corners::execute(args, env),
        Commands::Compare(args) => compare::execute(args, env),
        Commands::WhatIf(args) => what_if::execute(args, env),
        Commands::Standings(args) => standings::execute(args, env),
        Commands::Multi(args) => multi::execute(args, env),
        Commands::Demo(args) => demo::execute(args, env),
    }
}

pub(crate) fn load_datasets(dir: &Path) -> Result<Datasets> {
    Datasets::load_dir(dir)
        .with_context(|| format!("failed to load datasets from {}", dir.display()))
}

/// A driver is known when any table mentions it.
pub(crate) fn ensure_known_driver(datasets: &Datasets, driver: &str) -> Result<(), CliError> {
    let known = datasets.corner_features.iter().any(|row| row.vehicle_id == driver)
        || datasets.driver_stats.iter().any(|stat| stat.vehicle_id == driver)
        || datasets
            .comparisons
            .iter()
            .any(|record| record.slow_driver == driver || record.fast_driver == driver);
    if known {
        Ok(())
    } else {
        Err(CliError::DriverNotFound(driver.to_string()))
    }
}

pub(crate) fn resolve_benchmark(
    datasets: &Datasets,
    benchmark: Option<&str>,
    track: Option<&str>,
) -> Result<String, CliError> {
    let benchmark = benchmark.map_or(Benchmark::Fastest, |id| Benchmark::Driver(id.to_string()));
    if let Benchmark::Driver(id) = &benchmark {
        ensure_known_driver(datasets, id)?;
    }
    benchmark
        .resolve(&datasets.driver_stats, &datasets.corner_features, track)
        .ok_or(CliError::NoBenchmark)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn record(slow: &str, fast: &str, corner: u32) -> ComparisonRecord {
        ComparisonRecord {
            track: "VIR".to_string(),
            corner,
            slow_driver: slow.to_string(),
            fast_driver: fast.to_string(),
            time_lost_sec: 0.1,
            brake_delta: 0.0,
            apex_throttle_delta: 0.0,
            slow_brake: 0.0,
            fast_brake: 0.0,
            slow_apex_throttle: 0.0,
            fast_apex_throttle: 0.0,
        }
    }

    #[test]
    fn range_without_bounds_follows_precomputed_pair() -> TestResult {
        let comparisons = vec![record("a", "b", 3), record("a", "b", 9), record("c", "b", 14)];
        let range = RangeArgs::default().resolve(&comparisons, "a", "b", None)?;
        assert_eq!(range, CornerRange::new(3, 9));
        Ok(())
    }

    #[test]
    fn partial_range_fills_from_default() -> TestResult {
        let args = RangeArgs { from: Some(5), to: None };
        assert_eq!(args.resolve(&[], "a", "b", None)?, CornerRange::new(5, 20));
        Ok(())
    }

    #[test]
    fn inverted_range_is_rejected() {
        let args = RangeArgs { from: Some(9), to: Some(2) };
        let result = args.resolve(&[], "a", "b", None);
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn unknown_driver_is_not_found() {
        let datasets = Datasets {
            comparisons: vec![record("a", "b", 1)],
            ..Datasets::default()
        };
        assert!(matches!(ensure_known_driver(&datasets, "b"), Ok(())));
        assert!(matches!(
            ensure_known_driver(&datasets, "zz"),
            Err(CliError::DriverNotFound(ref d)) if d == "zz"
        ));
    }

    #[test]
    fn fastest_benchmark_without_any_data_is_an_error() {
        let result = resolve_benchmark(&Datasets::default(), None, None);
        assert!(matches!(result, Err(CliError::NoBenchmark)));
    }
}
