//! Telemetry and analysis data model.
//!
//! Everything here is a plain value type. Samples are produced by the dataset
//! loaders, corners and corner features by the segmentation stage, and
//! comparison records by the comparison engine or a precomputed table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sample timestamp in microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    pub fn as_micros(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

/// One raw long-format reading: a single channel value at a single instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub timestamp: Timestamp,
    pub vehicle_id: String,
    pub lap: u32,
    #[serde(rename = "telemetry_name")]
    pub channel: String,
    #[serde(rename = "telemetry_value")]
    pub value: f64,
}

impl TelemetrySample {
    pub fn new(
        timestamp: Timestamp,
        vehicle_id: impl Into<String>,
        lap: u32,
        channel: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            timestamp,
            vehicle_id: vehicle_id.into(),
            lap,
            channel: channel.into(),
            value,
        }
    }
}

/// A detected corner: positional indices into a [`crate::LapTelemetry`].
///
/// Segmentation guarantees `start <= apex <= end`. Indices are dense row
/// positions, not timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corner {
    pub start: usize,
    pub apex: usize,
    pub end: usize,
}

impl Corner {
    pub fn new(start: usize, apex: usize, end: usize) -> Self {
        Self { start, apex, end }
    }

    /// Corner length in samples, `end - start`.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every index of this corner addresses a row of a lap with `row_count` rows.
    pub fn fits_within(&self, row_count: usize) -> bool {
        self.start < row_count && self.apex < row_count && self.end < row_count
    }
}

/// Feature vector computed for one corner of one lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerFeature {
    /// 1-based, dense over the corners that survived extraction.
    pub corner_num: u32,
    pub start_idx: usize,
    pub apex_idx: usize,
    pub end_idx: usize,
    /// `end - start`, in samples.
    pub corner_duration: usize,
    pub entry_throttle: f64,
    pub apex_throttle: f64,
    pub min_throttle: f64,
    pub exit_throttle: f64,
    pub max_brake: f64,
    /// Samples in the corner window with front brake pressure above the activity threshold.
    pub brake_duration: usize,
    pub apex_lateral_g: f64,
    pub avg_steering_angle: f64,
    /// Lap row index where throttle first exceeds 50 inside the corner, or `end_idx`.
    pub throttle_application_point: usize,
}

/// A corner feature row attributed to a driver and a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverCornerFeature {
    pub track: String,
    pub vehicle_id: String,
    pub feature: CornerFeature,
}

impl DriverCornerFeature {
    pub fn new(
        track: impl Into<String>,
        vehicle_id: impl Into<String>,
        feature: CornerFeature,
    ) -> Self {
        Self {
            track: track.into(),
            vehicle_id: vehicle_id.into(),
            feature,
        }
    }

    pub fn corner_num(&self) -> u32 {
        self.feature.corner_num
    }
}

/// Directional corner comparison: every delta is `slow - fast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub track: String,
    pub corner: u32,
    pub slow_driver: String,
    pub fast_driver: String,
    pub time_lost_sec: f64,
    pub brake_delta: f64,
    pub apex_throttle_delta: f64,
    pub slow_brake: f64,
    pub fast_brake: f64,
    pub slow_apex_throttle: f64,
    pub fast_apex_throttle: f64,
}

/// Per-track lap time standing of a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStat {
    pub vehicle_id: String,
    pub track: String,
    #[serde(rename = "best_lap")]
    pub best_lap_time: f64,
    pub rank: u32,
    pub percentile: f64,
}

/// Driving-style cluster assigned to a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterLabel {
    pub vehicle_id: String,
    #[serde(rename = "cluster_label")]
    pub style_label: String,
}

/// Model feature importance, a fraction in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

impl FeatureImportance {
    /// Feature name for display: underscores become spaces, words capitalised.
    pub fn display_name(&self) -> String {
        self.feature
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}
