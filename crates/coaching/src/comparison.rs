//! Corner-by-corner driver comparison.
//!
//! A comparison first looks for precomputed records matching the query. Only
//! when that lookup comes back empty are records synthesized from the two
//! drivers' corner features. Both paths go through [`ComparisonEngine::compare`]
//! so the self-comparison guard and the `slow - fast` sign convention live in
//! one place.

use apexcoach_telemetry_core::{ComparisonRecord, CornerFeature, DriverCornerFeature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

/// Seconds per sample, assuming 25 Hz logging.
pub const SAMPLE_PERIOD_SECONDS: f64 = 0.04;

/// Inclusive range of corner numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CornerRange {
    pub low: u32,
    pub high: u32,
}

impl CornerRange {
    pub const DEFAULT_LOW: u32 = 1;
    pub const DEFAULT_HIGH: u32 = 20;

    pub fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, corner: u32) -> bool {
        (self.low..=self.high).contains(&corner)
    }

    pub fn corners(&self) -> RangeInclusive<u32> {
        self.low..=self.high
    }

    /// An inverted range selects nothing.
    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }
}

impl Default for CornerRange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOW, Self::DEFAULT_HIGH)
    }
}

impl fmt::Display for CornerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}-T{}", self.low, self.high)
    }
}

/// Who is compared against whom, where, and over which corners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonQuery {
    pub slow: String,
    pub fast: String,
    pub track: Option<String>,
    pub range: CornerRange,
}

impl ComparisonQuery {
    pub fn new(slow: impl Into<String>, fast: impl Into<String>, range: CornerRange) -> Self {
        Self {
            slow: slow.into(),
            fast: fast.into(),
            track: None,
            range,
        }
    }

    pub fn on_track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn is_self_comparison(&self) -> bool {
        self.slow == self.fast
    }

    /// The same query with the driver roles swapped.
    pub fn reversed(&self) -> Self {
        Self {
            slow: self.fast.clone(),
            fast: self.slow.clone(),
            track: self.track.clone(),
            range: self.range,
        }
    }
}

/// Where the records of a [`Comparison`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonSource {
    /// Records taken verbatim from the precomputed table.
    Precomputed,
    /// Records rebuilt from corner features.
    Synthesized,
    /// Slow and fast driver are the same; nothing was computed.
    SelfComparison,
}

impl fmt::Display for ComparisonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComparisonSource::Precomputed => "precomputed",
            ComparisonSource::Synthesized => "synthesized",
            ComparisonSource::SelfComparison => "self-comparison",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub source: ComparisonSource,
    pub records: Vec<ComparisonRecord>,
}

impl Comparison {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

type DriverIndex<'a> = BTreeMap<u32, BTreeMap<&'a str, &'a CornerFeature>>;

/// Lookup-then-fallback comparison over an immutable dataset snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonEngine<'a> {
    comparisons: &'a [ComparisonRecord],
    features: &'a [DriverCornerFeature],
}

impl<'a> ComparisonEngine<'a> {
    pub fn new(comparisons: &'a [ComparisonRecord], features: &'a [DriverCornerFeature]) -> Self {
        Self {
            comparisons,
            features,
        }
    }

    pub fn compare(&self, query: &ComparisonQuery) -> Comparison {
        if query.is_self_comparison() {
            tracing::debug!(driver = %query.slow, "self-comparison requested, nothing to compare");
            return Comparison {
                source: ComparisonSource::SelfComparison,
                records: Vec::new(),
            };
        }

        let records = self.lookup(query);
        if !records.is_empty() {
            return Comparison {
                source: ComparisonSource::Precomputed,
                records,
            };
        }

        tracing::info!(
            slow = %query.slow,
            fast = %query.fast,
            range = %query.range,
            "no precomputed comparison, deriving from corner features"
        );
        Comparison {
            source: ComparisonSource::Synthesized,
            records: self.synthesize(query),
        }
    }

    /// Precomputed records matching the query, in table order.
    pub fn lookup(&self, query: &ComparisonQuery) -> Vec<ComparisonRecord> {
        self.comparisons
            .iter()
            .filter(|record| {
                record.slow_driver == query.slow
                    && record.fast_driver == query.fast
                    && query.range.contains(record.corner)
                    && query.track.as_deref().is_none_or(|track| record.track == track)
            })
            .cloned()
            .collect()
    }

    /// Records rebuilt from corner features, one per corner number in range
    /// where both drivers have a feature.
    ///
    /// Without a track filter a corner is taken from the first track, by
    /// name, on which both drivers have it.
    pub fn synthesize(&self, query: &ComparisonQuery) -> Vec<ComparisonRecord> {
        let slow = self.index_driver(&query.slow, query.track.as_deref());
        let fast = self.index_driver(&query.fast, query.track.as_deref());

        let mut records = Vec::new();
        if query.range.is_empty() {
            return records;
        }
        for (&corner, slow_tracks) in slow.range(query.range.corners()) {
            let Some(fast_tracks) = fast.get(&corner) else {
                continue;
            };
            let pair = slow_tracks.iter().find_map(|(track, slow_feature)| {
                fast_tracks
                    .get(track)
                    .map(|fast_feature| (*track, *slow_feature, *fast_feature))
            });
            if let Some((track, slow_feature, fast_feature)) = pair {
                records.push(synthesize_record(
                    track,
                    corner,
                    &query.slow,
                    &query.fast,
                    slow_feature,
                    fast_feature,
                ));
            }
        }
        records
    }

    /// First feature of one driver per corner number, then per track.
    fn index_driver(&self, driver: &str, track: Option<&str>) -> DriverIndex<'a> {
        let mut index = DriverIndex::new();
        for row in self.features {
            if row.vehicle_id != driver || track.is_some_and(|track| row.track != track) {
                continue;
            }
            index
                .entry(row.corner_num())
                .or_default()
                .entry(row.track.as_str())
                .or_insert(&row.feature);
        }
        index
    }
}

fn synthesize_record(
    track: &str,
    corner: u32,
    slow_driver: &str,
    fast_driver: &str,
    slow: &CornerFeature,
    fast: &CornerFeature,
) -> ComparisonRecord {
    let duration_delta = samples(slow.corner_duration) - samples(fast.corner_duration);
    ComparisonRecord {
        track: track.to_string(),
        corner,
        slow_driver: slow_driver.to_string(),
        fast_driver: fast_driver.to_string(),
        time_lost_sec: duration_delta * SAMPLE_PERIOD_SECONDS,
        brake_delta: slow.max_brake - fast.max_brake,
        apex_throttle_delta: slow.apex_throttle - fast.apex_throttle,
        slow_brake: slow.max_brake,
        fast_brake: fast.max_brake,
        slow_apex_throttle: slow.apex_throttle,
        fast_apex_throttle: fast.apex_throttle,
    }
}

fn samples(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

/// Compare two drivers over an immutable dataset snapshot.
pub fn compare_drivers(
    comparisons: &[ComparisonRecord],
    features: &[DriverCornerFeature],
    query: &ComparisonQuery,
) -> Vec<ComparisonRecord> {
    ComparisonEngine::new(comparisons, features).compare(query).records
}
