//! Corner detection over one lap of raw telemetry.

use crate::commands::{CommandEnv, CornersArgs};
use crate::error::CliError;
use crate::output;
use anyhow::{Context, Result};
use apexcoach_corner_analysis::{SegmentationConfig, analyze_lap};
use apexcoach_datasets::load_sample_set;
use apexcoach_errors::ValidationError;
use apexcoach_telemetry_core::{ChannelCoverage, CornerFeature, reshape_lap};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CornersReport {
    pub vehicle_id: String,
    pub lap: u32,
    pub samples: usize,
    pub segmentation: SegmentationConfig,
    pub coverage: ChannelCoverage,
    pub track: Option<String>,
    /// Whether the corner count fits the track profile; `None` without a profile.
    pub plausible: Option<bool>,
    pub corners: Vec<CornerFeature>,
}

pub fn execute(args: &CornersArgs, env: &CommandEnv) -> Result<()> {
    let report = run(args, env)?;
    if env.json {
        output::print_json("corners", &report)
    } else {
        output::print_corners(&report);
        Ok(())
    }
}

fn run(args: &CornersArgs, env: &CommandEnv) -> Result<CornersReport> {
    let segmentation = segmentation(env.config.segmentation, args)?;
    let samples = load_sample_set(&args.telemetry)
        .with_context(|| format!("failed to load telemetry from {}", args.telemetry.display()))?;
    let lap = reshape_lap(&samples, &args.vehicle, args.lap)
        .ok_or_else(|| CliError::NotTelemetry(args.telemetry.display().to_string()))?;
    if lap.is_empty() {
        return Err(CliError::LapNotFound {
            vehicle: args.vehicle.clone(),
            lap: args.lap,
        }
        .into());
    }

    let coverage = ChannelCoverage::detect(&lap, &env.config.channels);
    for channel in coverage.missing() {
        tracing::warn!(%channel, "channel not present, dependent features default to zero");
    }

    let corners = analyze_lap(&lap, &segmentation, &env.config.channels);
    let plausible = args
        .track
        .as_deref()
        .and_then(|track| check_corner_count(env, track, corners.len()));

    Ok(CornersReport {
        vehicle_id: args.vehicle.clone(),
        lap: args.lap,
        samples: lap.len(),
        segmentation,
        coverage,
        track: args.track.clone(),
        plausible,
        corners,
    })
}

/// Apply command-line overrides on top of the configured segmentation.
fn segmentation(
    base: SegmentationConfig,
    args: &CornersArgs,
) -> Result<SegmentationConfig, CliError> {
    let mut config = base;
    if let Some(threshold) = args.threshold {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ValidationError::out_of_range("--threshold", threshold, 0.0, 100.0).into());
        }
        config.throttle_threshold = threshold;
    }
    if let Some(min_length) = args.min_length {
        if min_length == 0 {
            return Err(ValidationError::out_of_range("--min-length", 0, 1, usize::MAX).into());
        }
        config.min_corner_length = min_length;
    }
    Ok(config)
}

fn check_corner_count(env: &CommandEnv, track: &str, corners: usize) -> Option<bool> {
    let Some(profile) = env.config.track(track) else {
        tracing::warn!(track, "no profile for track, corner count not checked");
        return None;
    };
    let plausible = profile.corner_count_plausible(corners);
    if !plausible {
        let (min, max) = profile.expected_corners;
        tracing::warn!(track, corners, min, max, "corner count outside the track's expected range");
    }
    Some(plausible)
}
