//! Full pipeline over two synthetic laps: reshape, segment, extract,
//! compare, coach and project.

use crate::commands::compare::CompareReport;
use crate::commands::what_if::validate_improvement;
use crate::commands::{CommandEnv, DemoArgs};
use crate::error::CliError;
use crate::output;
use anyhow::Result;
use apexcoach_coaching::{ComparisonQuery, CornerRange, WhatIfProjection, project_what_if};
use apexcoach_corner_analysis::analyze_lap;
use apexcoach_datasets::{SyntheticLap, demo_lap, demo_rival_lap};
use apexcoach_telemetry_core::{CornerFeature, DriverCornerFeature, SampleSet, reshape_lap};
use serde::Serialize;

pub const DEMO_TRACK: &str = "Demo Circuit";
pub const DEMO_FAST_DRIVER: &str = "DEMO-001";
pub const DEMO_SLOW_DRIVER: &str = "DEMO-002";

#[derive(Debug, Serialize)]
pub struct DemoLap {
    pub vehicle_id: String,
    pub lap: u32,
    pub samples: usize,
    pub lap_time_sec: f64,
    pub corners: Vec<CornerFeature>,
}

#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub track: String,
    pub laps: Vec<DemoLap>,
    pub comparison: CompareReport,
    pub what_if: WhatIfProjection,
}

pub fn execute(args: &DemoArgs, env: &CommandEnv) -> Result<()> {
    let report = run(args, env)?;
    if env.json {
        output::print_json("demo", &report)
    } else {
        output::print_demo(&report);
        Ok(())
    }
}

pub fn run(args: &DemoArgs, env: &CommandEnv) -> Result<DemoReport, CliError> {
    let improvement = validate_improvement(args.improvement)?;
    let fast = demo_lap(DEMO_FAST_DRIVER);
    let slow = demo_rival_lap(DEMO_SLOW_DRIVER);

    let mut samples = fast.samples();
    samples.extend(slow.samples());
    let samples = SampleSet::long_format(samples);

    let mut laps = Vec::new();
    let mut features = Vec::new();
    for synthetic in [&fast, &slow] {
        let lap = analyze_synthetic(&samples, synthetic, env)?;
        features.extend(
            lap.corners.iter().cloned().map(|feature| {
                DriverCornerFeature::new(DEMO_TRACK, lap.vehicle_id.as_str(), feature)
            }),
        );
        laps.push(lap);
    }
    tracing::info!(features = features.len(), "analysed synthetic laps");

    let query = ComparisonQuery::new(DEMO_SLOW_DRIVER, DEMO_FAST_DRIVER, CornerRange::default())
        .on_track(DEMO_TRACK);
    Ok(DemoReport {
        track: DEMO_TRACK.to_string(),
        laps,
        comparison: CompareReport::build(&[], &features, query),
        what_if: project_what_if(improvement, slow.lap_time_sec()),
    })
}

fn analyze_synthetic(
    samples: &SampleSet,
    synthetic: &SyntheticLap,
    env: &CommandEnv,
) -> Result<DemoLap, CliError> {
    let lap = reshape_lap(samples, synthetic.vehicle_id(), synthetic.lap())
        .ok_or_else(|| CliError::NotTelemetry("synthetic lap".to_string()))?;
    Ok(DemoLap {
        vehicle_id: synthetic.vehicle_id().to_string(),
        lap: synthetic.lap(),
        samples: lap.len(),
        lap_time_sec: synthetic.lap_time_sec(),
        corners: analyze_lap(&lap, &env.config.segmentation, &env.config.channels),
    })
}
