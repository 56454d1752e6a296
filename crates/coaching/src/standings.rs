//! Driver standings, benchmark selection and dataset summaries.

use crate::comparison::{ComparisonEngine, ComparisonQuery, CornerRange};
use apexcoach_telemetry_core::{
    ClusterLabel, ComparisonRecord, DriverCornerFeature, DriverStat, FeatureImportance,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Feature importances shown when the caller does not ask for a count.
pub const DEFAULT_TOP_FEATURES: usize = 4;

fn on_track(row_track: &str, track: Option<&str>) -> bool {
    track.is_none_or(|track| row_track == track)
}

/// Stat row with the smallest best lap. The first row wins ties.
pub fn fastest_driver<'a>(stats: &'a [DriverStat], track: Option<&str>) -> Option<&'a DriverStat> {
    stats
        .iter()
        .filter(|stat| on_track(&stat.track, track))
        .reduce(|best, stat| {
            if stat.best_lap_time < best.best_lap_time {
                stat
            } else {
                best
            }
        })
}

pub fn driver_stat<'a>(
    stats: &'a [DriverStat],
    driver: &str,
    track: Option<&str>,
) -> Option<&'a DriverStat> {
    stats
        .iter()
        .find(|stat| stat.vehicle_id == driver && on_track(&stat.track, track))
}

/// Number of stat rows on the track, the field size a rank is out of.
pub fn field_size(stats: &[DriverStat], track: Option<&str>) -> usize {
    stats.iter().filter(|stat| on_track(&stat.track, track)).count()
}

pub fn style_label<'a>(clusters: &'a [ClusterLabel], driver: &str) -> Option<&'a str> {
    clusters
        .iter()
        .find(|cluster| cluster.vehicle_id == driver)
        .map(|cluster| cluster.style_label.as_str())
}

/// Drivers with corner features, sorted and deduplicated.
pub fn available_drivers<'a>(
    features: &'a [DriverCornerFeature],
    track: Option<&str>,
) -> Vec<&'a str> {
    features
        .iter()
        .filter(|row| on_track(&row.track, track))
        .map(|row| row.vehicle_id.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderGap {
    pub seconds: f64,
    /// Gap as a percentage of the leader's best lap.
    pub percent: f64,
}

/// Gap between a driver's best lap and the fastest best lap.
pub fn gap_to_leader(stats: &[DriverStat], driver: &str, track: Option<&str>) -> Option<LeaderGap> {
    let own = driver_stat(stats, driver, track)?;
    let leader = fastest_driver(stats, track)?;
    let seconds = own.best_lap_time - leader.best_lap_time;
    let percent = if leader.best_lap_time > 0.0 {
        seconds / leader.best_lap_time * 100.0
    } else {
        0.0
    };
    Some(LeaderGap { seconds, percent })
}

/// Reference driver for comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    /// The driver with the best lap on the selected track.
    #[default]
    Fastest,
    Driver(String),
}

impl Benchmark {
    /// Resolve to a driver id. Without stats the fastest benchmark falls back
    /// to the first available driver.
    pub fn resolve(
        &self,
        stats: &[DriverStat],
        features: &[DriverCornerFeature],
        track: Option<&str>,
    ) -> Option<String> {
        match self {
            Benchmark::Driver(id) => Some(id.clone()),
            Benchmark::Fastest => fastest_driver(stats, track)
                .map(|stat| stat.vehicle_id.clone())
                .or_else(|| {
                    available_drivers(features, track)
                        .first()
                        .map(|driver| (*driver).to_string())
                }),
        }
    }
}

/// Corner range spanned by the precomputed comparisons of a driver pair,
/// or the default range when there are none.
pub fn default_corner_range(
    comparisons: &[ComparisonRecord],
    slow: &str,
    fast: &str,
    track: Option<&str>,
) -> CornerRange {
    let corners = comparisons
        .iter()
        .filter(|record| {
            record.slow_driver == slow
                && record.fast_driver == fast
                && on_track(&record.track, track)
        })
        .map(|record| record.corner);
    let bounds = corners.fold(None, |bounds: Option<(u32, u32)>, corner| match bounds {
        None => Some((corner, corner)),
        Some((low, high)) => Some((low.min(corner), high.max(corner))),
    });
    bounds.map_or_else(CornerRange::default, |(low, high)| CornerRange::new(low, high))
}

/// Most important model features first. Ties keep table order.
pub fn top_features(importances: &[FeatureImportance], n: usize) -> Vec<&FeatureImportance> {
    let mut ranked: Vec<&FeatureImportance> = importances.iter().collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked.truncate(n);
    ranked
}

/// One driver's comparison series against the benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverTimeLoss {
    pub driver: String,
    pub records: Vec<ComparisonRecord>,
}

/// Compare each driver to the benchmark over `range`, sorted by corner.
/// The benchmark itself is skipped.
pub fn multi_driver_time_loss(
    engine: &ComparisonEngine<'_>,
    drivers: &[String],
    benchmark: &str,
    track: Option<&str>,
    range: CornerRange,
) -> Vec<DriverTimeLoss> {
    drivers
        .iter()
        .filter(|driver| driver.as_str() != benchmark)
        .map(|driver| {
            let mut query = ComparisonQuery::new(driver.as_str(), benchmark, range);
            query.track = track.map(str::to_string);
            let mut records = engine.compare(&query).records;
            records.sort_by_key(|record| record.corner);
            DriverTimeLoss {
                driver: driver.clone(),
                records,
            }
        })
        .collect()
}

/// Size of the loaded corner feature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub corner_count: usize,
    pub driver_count: usize,
    pub track_count: usize,
}

impl DatasetSummary {
    pub fn of(features: &[DriverCornerFeature]) -> Self {
        let drivers: BTreeSet<&str> = features.iter().map(|row| row.vehicle_id.as_str()).collect();
        let tracks: BTreeSet<&str> = features.iter().map(|row| row.track.as_str()).collect();
        Self {
            corner_count: features.len(),
            driver_count: drivers.len(),
            track_count: tracks.len(),
        }
    }
}
