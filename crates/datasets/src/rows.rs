//! CSV row shapes of the dataset tables.
//!
//! Tables written by dataframe tools leave empty cells for missing numbers
//! and may render integer columns as `12.0`. Rows are therefore read
//! leniently here and converted into the core types; missing measurements
//! become zero, like a missing channel does during feature extraction.

use apexcoach_telemetry_core::{
    ClusterLabel, ComparisonRecord, CornerFeature, DriverCornerFeature, DriverStat,
    FeatureImportance,
};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// A table row: which file it lives in, which columns it needs, and the
/// record it becomes.
pub(crate) trait TableRow: DeserializeOwned + Serialize {
    type Record;

    const FILE_NAME: &'static str;
    const REQUIRED_COLUMNS: &'static [&'static str];

    fn into_record(self) -> Self::Record;
    fn from_record(record: &Self::Record) -> Self;
}

/// Parse a non-negative integer written either as `12` or `12.0`.
pub(crate) fn parse_count(text: &str) -> Option<u32> {
    let text = text.trim();
    let integral = match text.split_once('.') {
        Some((integral, fraction)) if fraction.chars().all(|c| c == '0') => integral,
        Some(_) => return None,
        None => text,
    };
    integral.parse().ok()
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_count(&text).ok_or_else(|| de::Error::custom(format!("'{text}' is not a count")))
}

fn index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    count(deserializer).map(widen)
}

fn optional_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
    let text = Option::<String>::deserialize(deserializer)?;
    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_count(text)
            .map(|value| Some(widen(value)))
            .ok_or_else(|| de::Error::custom(format!("'{text}' is not an index"))),
    }
}

fn widen(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FeatureRow {
    track: String,
    vehicle_id: String,
    #[serde(deserialize_with = "count")]
    corner_num: u32,
    #[serde(default, deserialize_with = "optional_index")]
    start_idx: Option<usize>,
    #[serde(default, deserialize_with = "optional_index")]
    apex_idx: Option<usize>,
    #[serde(default, deserialize_with = "optional_index")]
    end_idx: Option<usize>,
    #[serde(deserialize_with = "index")]
    corner_duration: usize,
    entry_throttle: Option<f64>,
    apex_throttle: Option<f64>,
    min_throttle: Option<f64>,
    exit_throttle: Option<f64>,
    max_brake: Option<f64>,
    #[serde(default, deserialize_with = "optional_index")]
    brake_duration: Option<usize>,
    apex_lateral_g: Option<f64>,
    avg_steering_angle: Option<f64>,
    /// Missing means the driver never reapplied throttle in the corner.
    #[serde(default, deserialize_with = "optional_index")]
    throttle_application_point: Option<usize>,
}

impl TableRow for FeatureRow {
    type Record = DriverCornerFeature;

    const FILE_NAME: &'static str = "master_corner_features.csv";
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "track",
        "vehicle_id",
        "corner_num",
        "corner_duration",
        "apex_throttle",
        "max_brake",
    ];

    fn into_record(self) -> DriverCornerFeature {
        let start_idx = self.start_idx.unwrap_or(0);
        let end_idx = self
            .end_idx
            .unwrap_or_else(|| start_idx.saturating_add(self.corner_duration));
        let feature = CornerFeature {
            corner_num: self.corner_num,
            start_idx,
            apex_idx: self.apex_idx.unwrap_or(start_idx),
            end_idx,
            corner_duration: self.corner_duration,
            entry_throttle: or_zero(self.entry_throttle),
            apex_throttle: or_zero(self.apex_throttle),
            min_throttle: or_zero(self.min_throttle),
            exit_throttle: or_zero(self.exit_throttle),
            max_brake: or_zero(self.max_brake),
            brake_duration: self.brake_duration.unwrap_or(0),
            apex_lateral_g: or_zero(self.apex_lateral_g),
            avg_steering_angle: or_zero(self.avg_steering_angle),
            throttle_application_point: self.throttle_application_point.unwrap_or(end_idx),
        };
        DriverCornerFeature::new(self.track, self.vehicle_id, feature)
    }

    fn from_record(record: &DriverCornerFeature) -> Self {
        let f = &record.feature;
        Self {
            track: record.track.clone(),
            vehicle_id: record.vehicle_id.clone(),
            corner_num: f.corner_num,
            start_idx: Some(f.start_idx),
            apex_idx: Some(f.apex_idx),
            end_idx: Some(f.end_idx),
            corner_duration: f.corner_duration,
            entry_throttle: Some(f.entry_throttle),
            apex_throttle: Some(f.apex_throttle),
            min_throttle: Some(f.min_throttle),
            exit_throttle: Some(f.exit_throttle),
            max_brake: Some(f.max_brake),
            brake_duration: Some(f.brake_duration),
            apex_lateral_g: Some(f.apex_lateral_g),
            avg_steering_angle: Some(f.avg_steering_angle),
            throttle_application_point: Some(f.throttle_application_point),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ComparisonRow {
    track: String,
    #[serde(deserialize_with = "count")]
    corner: u32,
    slow_driver: String,
    fast_driver: String,
    time_lost_sec: Option<f64>,
    brake_delta: Option<f64>,
    apex_throttle_delta: Option<f64>,
    slow_brake: Option<f64>,
    fast_brake: Option<f64>,
    slow_apex_throttle: Option<f64>,
    fast_apex_throttle: Option<f64>,
}

impl TableRow for ComparisonRow {
    type Record = ComparisonRecord;

    const FILE_NAME: &'static str = "master_comparisons.csv";
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "track",
        "corner",
        "slow_driver",
        "fast_driver",
        "time_lost_sec",
        "brake_delta",
        "apex_throttle_delta",
    ];

    fn into_record(self) -> ComparisonRecord {
        ComparisonRecord {
            track: self.track,
            corner: self.corner,
            slow_driver: self.slow_driver,
            fast_driver: self.fast_driver,
            time_lost_sec: or_zero(self.time_lost_sec),
            brake_delta: or_zero(self.brake_delta),
            apex_throttle_delta: or_zero(self.apex_throttle_delta),
            slow_brake: or_zero(self.slow_brake),
            fast_brake: or_zero(self.fast_brake),
            slow_apex_throttle: or_zero(self.slow_apex_throttle),
            fast_apex_throttle: or_zero(self.fast_apex_throttle),
        }
    }

    fn from_record(record: &ComparisonRecord) -> Self {
        Self {
            track: record.track.clone(),
            corner: record.corner,
            slow_driver: record.slow_driver.clone(),
            fast_driver: record.fast_driver.clone(),
            time_lost_sec: Some(record.time_lost_sec),
            brake_delta: Some(record.brake_delta),
            apex_throttle_delta: Some(record.apex_throttle_delta),
            slow_brake: Some(record.slow_brake),
            fast_brake: Some(record.fast_brake),
            slow_apex_throttle: Some(record.slow_apex_throttle),
            fast_apex_throttle: Some(record.fast_apex_throttle),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StatRow {
    vehicle_id: String,
    track: String,
    best_lap: f64,
    #[serde(deserialize_with = "count")]
    rank: u32,
    percentile: Option<f64>,
}

impl TableRow for StatRow {
    type Record = DriverStat;

    const FILE_NAME: &'static str = "driver_performance_stats.csv";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["vehicle_id", "track", "best_lap", "rank"];

    fn into_record(self) -> DriverStat {
        DriverStat {
            vehicle_id: self.vehicle_id,
            track: self.track,
            best_lap_time: self.best_lap,
            rank: self.rank,
            percentile: or_zero(self.percentile),
        }
    }

    fn from_record(record: &DriverStat) -> Self {
        Self {
            vehicle_id: record.vehicle_id.clone(),
            track: record.track.clone(),
            best_lap: record.best_lap_time,
            rank: record.rank,
            percentile: Some(record.percentile),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ClusterRow {
    vehicle_id: String,
    cluster_label: String,
}

impl TableRow for ClusterRow {
    type Record = ClusterLabel;

    const FILE_NAME: &'static str = "driver_clusters.csv";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["vehicle_id", "cluster_label"];

    fn into_record(self) -> ClusterLabel {
        ClusterLabel {
            vehicle_id: self.vehicle_id,
            style_label: self.cluster_label,
        }
    }

    fn from_record(record: &ClusterLabel) -> Self {
        Self {
            vehicle_id: record.vehicle_id.clone(),
            cluster_label: record.style_label.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ImportanceRow {
    feature: String,
    importance: f64,
}

impl TableRow for ImportanceRow {
    type Record = FeatureImportance;

    const FILE_NAME: &'static str = "ml_feature_importance.csv";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["feature", "importance"];

    fn into_record(self) -> FeatureImportance {
        FeatureImportance {
            feature: self.feature,
            importance: self.importance,
        }
    }

    fn from_record(record: &FeatureImportance) -> Self {
        Self {
            feature: record.feature.clone(),
            importance: record.importance,
        }
    }
}
