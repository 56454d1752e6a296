//! Pipeline drivers shared by the end-to-end tests.

use apexcoach_coaching::{
    Comparison, ComparisonEngine, ComparisonQuery, CornerInsight, CornerRange, corner_insights,
};
use apexcoach_corner_analysis::analyze_lap;
use apexcoach_datasets::{Datasets, SyntheticLap};
use apexcoach_telemetry_config::AnalysisConfig;
use apexcoach_telemetry_core::{
    CornerFeature, DriverCornerFeature, DriverStat, SampleSet, reshape_lap,
};

/// Corner features of one lap, or `None` when the set is not telemetry.
pub fn lap_features(
    samples: &SampleSet,
    vehicle_id: &str,
    lap: u32,
    config: &AnalysisConfig,
) -> Option<Vec<CornerFeature>> {
    let telemetry = reshape_lap(samples, vehicle_id, lap)?;
    Some(analyze_lap(&telemetry, &config.segmentation, &config.channels))
}

/// Corner features of every lap in the set, attributed to `track`.
pub fn sample_set_features(
    samples: &SampleSet,
    track: &str,
    config: &AnalysisConfig,
) -> Vec<DriverCornerFeature> {
    let mut features = Vec::new();
    for (vehicle_id, lap) in samples.laps() {
        let Some(corners) = lap_features(samples, &vehicle_id, lap, config) else {
            continue;
        };
        tracing::debug!(vehicle_id, lap, corners = corners.len(), "analysed lap");
        features.extend(
            corners
                .into_iter()
                .map(|feature| DriverCornerFeature::new(track, vehicle_id.as_str(), feature)),
        );
    }
    features
}

/// Stat rows ranking the laps by lap time.
pub fn stats_for(laps: &[SyntheticLap], track: &str) -> Vec<DriverStat> {
    let mut ordered: Vec<&SyntheticLap> = laps.iter().collect();
    ordered.sort_by(|a, b| a.lap_time_sec().total_cmp(&b.lap_time_sec()));
    let field = u32::try_from(ordered.len()).map_or(f64::from(u32::MAX), f64::from);
    ordered
        .into_iter()
        .zip(1u32..)
        .map(|(lap, rank)| DriverStat {
            vehicle_id: lap.vehicle_id().to_string(),
            track: track.to_string(),
            best_lap_time: lap.lap_time_sec(),
            rank,
            percentile: (field - f64::from(rank) + 1.0) / field * 100.0,
        })
        .collect()
}

/// Dataset snapshot of a field: features and stats, no precomputed comparisons.
pub fn field_datasets(laps: &[SyntheticLap], track: &str, config: &AnalysisConfig) -> Datasets {
    let samples = SampleSet::long_format(laps.iter().flat_map(SyntheticLap::samples).collect());
    Datasets {
        corner_features: sample_set_features(&samples, track, config),
        driver_stats: stats_for(laps, track),
        ..Datasets::default()
    }
}

/// Everything one coaching session produces.
#[derive(Debug, Clone, PartialEq)]
pub struct CoachingRun {
    pub comparison: Comparison,
    pub insights: Vec<CornerInsight>,
}

/// Compare `slow` against `fast` on `track` over the default corner range.
pub fn coach(datasets: &Datasets, track: &str, slow: &str, fast: &str) -> CoachingRun {
    let engine = ComparisonEngine::new(&datasets.comparisons, &datasets.corner_features);
    let query = ComparisonQuery::new(slow, fast, CornerRange::default()).on_track(track);
    let comparison = engine.compare(&query);
    let insights = corner_insights(&comparison.records);
    CoachingRun { comparison, insights }
}
