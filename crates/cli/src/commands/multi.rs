//! Time loss of several drivers against one benchmark.

use crate::commands::{CommandEnv, MultiArgs, ensure_known_driver, load_datasets, resolve_benchmark};
use crate::output;
use anyhow::Result;
use apexcoach_coaching::{ComparisonEngine, CornerRange, multi_driver_time_loss, recoverable_time};
use apexcoach_telemetry_core::ComparisonRecord;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DriverLoss {
    pub driver: String,
    pub total_time_lost_sec: f64,
    pub records: Vec<ComparisonRecord>,
}

#[derive(Debug, Serialize)]
pub struct MultiReport {
    pub benchmark: String,
    pub track: Option<String>,
    pub range: CornerRange,
    pub drivers: Vec<DriverLoss>,
}

pub fn execute(args: &MultiArgs, env: &CommandEnv) -> Result<()> {
    let datasets = load_datasets(&args.data.data)?;
    let track = args.track.as_deref();
    for driver in &args.drivers {
        ensure_known_driver(&datasets, driver)?;
    }
    let benchmark = resolve_benchmark(&datasets, args.benchmark.as_deref(), track)?;
    let range = args.range.explicit()?.unwrap_or_default();

    let engine = ComparisonEngine::new(&datasets.comparisons, &datasets.corner_features);
    let drivers = multi_driver_time_loss(&engine, &args.drivers, &benchmark, track, range)
        .into_iter()
        .map(|loss| DriverLoss {
            total_time_lost_sec: recoverable_time(&loss.records),
            driver: loss.driver,
            records: loss.records,
        })
        .collect();
    let report = MultiReport {
        benchmark,
        track: args.track.clone(),
        range,
        drivers,
    };

    if env.json {
        output::print_json("multi", &report)
    } else {
        output::print_multi(&report);
        Ok(())
    }
}
