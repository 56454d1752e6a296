//! Long-format sample sets and the lap reshaper.
//!
//! Raw telemetry arrives as one row per `(timestamp, channel)` reading. The
//! reshaper turns the readings of one vehicle/lap into a time-ordered sequence
//! of records, one per distinct timestamp, each mapping channel name to value.
//! Row positions in the result are dense (`0..n`) and are what corners index.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::channels::FieldSchema;
use crate::model::{TelemetrySample, Timestamp};

/// Column carrying the channel name in long-format telemetry.
pub const CHANNEL_NAME_FIELD: &str = "telemetry_name";
/// Column carrying the channel value in long-format telemetry.
pub const CHANNEL_VALUE_FIELD: &str = "telemetry_value";

/// Columns of a well-formed long-format telemetry table.
pub const LONG_FORMAT_FIELDS: [&str; 5] = [
    "timestamp",
    "vehicle_id",
    "lap",
    CHANNEL_NAME_FIELD,
    CHANNEL_VALUE_FIELD,
];

/// A batch of raw samples together with the schema of the table they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    schema: BTreeSet<String>,
    samples: Vec<TelemetrySample>,
}

impl SampleSet {
    /// Sample set with the standard long-format schema.
    pub fn long_format(samples: Vec<TelemetrySample>) -> Self {
        Self {
            schema: LONG_FORMAT_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            samples,
        }
    }

    /// Sample set with an explicit schema, e.g. the header of a loaded file.
    pub fn with_schema<I, S>(columns: I, samples: Vec<TelemetrySample>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema: columns.into_iter().map(Into::into).collect(),
            samples,
        }
    }

    pub fn schema(&self) -> &BTreeSet<String> {
        &self.schema
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the schema exposes both the channel-name and channel-value fields.
    pub fn is_long_format(&self) -> bool {
        self.schema.has_field(CHANNEL_NAME_FIELD) && self.schema.has_field(CHANNEL_VALUE_FIELD)
    }

    /// Distinct `(vehicle_id, lap)` pairs present, sorted.
    pub fn laps(&self) -> Vec<(String, u32)> {
        self.samples
            .iter()
            .map(|s| (s.vehicle_id.clone(), s.lap))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Channel readings at a single timestamp. Channels may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub timestamp: Timestamp,
    pub values: BTreeMap<String, f64>,
}

impl LapRecord {
    pub fn get(&self, channel: &str) -> Option<f64> {
        self.values.get(channel).copied()
    }
}

/// Time-ordered telemetry of one vehicle on one lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTelemetry {
    vehicle_id: String,
    lap: u32,
    records: Vec<LapRecord>,
    channels: BTreeSet<String>,
}

impl LapTelemetry {
    /// Build from records, sorting by timestamp. Records sharing a timestamp
    /// are merged, earlier readings winning.
    pub fn from_records(vehicle_id: impl Into<String>, lap: u32, records: Vec<LapRecord>) -> Self {
        let mut by_time: BTreeMap<Timestamp, BTreeMap<String, f64>> = BTreeMap::new();
        for record in records {
            let slot = by_time.entry(record.timestamp).or_default();
            for (channel, value) in record.values {
                slot.entry(channel).or_insert(value);
            }
        }
        Self::from_ordered(vehicle_id.into(), lap, by_time)
    }

    /// Build from per-channel traces sampled at 25 Hz. `None` entries leave the
    /// channel absent at that row. Traces of unequal length pad with absences.
    pub fn from_channel_traces<I, S>(vehicle_id: impl Into<String>, lap: u32, traces: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Option<f64>>)>,
        S: Into<String>,
    {
        const SAMPLE_PERIOD_MS: i64 = 40;

        let mut by_time: BTreeMap<Timestamp, BTreeMap<String, f64>> = BTreeMap::new();
        let mut row_count = 0usize;
        for (channel, trace) in traces {
            let channel = channel.into();
            row_count = row_count.max(trace.len());
            for (index, value) in trace.into_iter().enumerate() {
                let timestamp = Timestamp::from_millis(
                    i64::try_from(index).unwrap_or(i64::MAX).saturating_mul(SAMPLE_PERIOD_MS),
                );
                let slot = by_time.entry(timestamp).or_default();
                if let Some(value) = value {
                    slot.insert(channel.clone(), value);
                }
            }
        }
        debug_assert_eq!(by_time.len(), row_count);
        Self::from_ordered(vehicle_id.into(), lap, by_time)
    }

    fn from_ordered(
        vehicle_id: String,
        lap: u32,
        by_time: BTreeMap<Timestamp, BTreeMap<String, f64>>,
    ) -> Self {
        let channels = by_time
            .values()
            .flat_map(|values| values.keys().cloned())
            .collect();
        let records = by_time
            .into_iter()
            .map(|(timestamp, values)| LapRecord { timestamp, values })
            .collect();
        Self {
            vehicle_id,
            lap,
            records,
            channels,
        }
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn lap(&self) -> u32 {
        self.lap
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LapRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&LapRecord> {
        self.records.get(index)
    }

    /// Every channel name seen anywhere in the lap.
    pub fn channel_names(&self) -> &BTreeSet<String> {
        &self.channels
    }

    /// Value of `channel` at row `index`, if both exist.
    pub fn value(&self, index: usize, channel: &str) -> Option<f64> {
        self.records.get(index).and_then(|record| record.get(channel))
    }

    /// Values of `channel` over the inclusive row window `[start, end]`,
    /// clipped to the lap.
    pub fn window(&self, channel: &str, start: usize, end: usize) -> Vec<Option<f64>> {
        self.records
            .iter()
            .skip(start)
            .take(end.saturating_sub(start).saturating_add(1))
            .map(|record| record.get(channel))
            .collect()
    }

    /// Whole-lap trace of `channel`.
    pub fn trace(&self, channel: &str) -> Vec<Option<f64>> {
        self.records.iter().map(|record| record.get(channel)).collect()
    }
}

impl FieldSchema for LapTelemetry {
    fn has_field(&self, name: &str) -> bool {
        self.channels.contains(name)
    }
}

/// Reshape the samples of one vehicle/lap into a [`LapTelemetry`].
///
/// Returns `None` when the sample set is not long-format telemetry. A lap
/// without matching samples yields an empty `LapTelemetry`, not `None`.
pub fn reshape_lap(samples: &SampleSet, vehicle_id: &str, lap: u32) -> Option<LapTelemetry> {
    if !samples.is_long_format() {
        tracing::debug!(
            fields = samples.schema().len(),
            "sample set lacks channel name/value fields, not telemetry data"
        );
        return None;
    }

    let mut by_time: BTreeMap<Timestamp, BTreeMap<String, f64>> = BTreeMap::new();
    for sample in samples
        .samples()
        .iter()
        .filter(|s| s.lap == lap && s.vehicle_id == vehicle_id)
    {
        by_time
            .entry(sample.timestamp)
            .or_default()
            .entry(sample.channel.clone())
            .or_insert(sample.value);
    }

    let lap_telemetry = LapTelemetry::from_ordered(vehicle_id.to_string(), lap, by_time);
    tracing::debug!(
        vehicle_id,
        lap,
        rows = lap_telemetry.len(),
        channels = lap_telemetry.channel_names().len(),
        "reshaped lap"
    );
    Some(lap_telemetry)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn sample(ms: i64, vehicle: &str, lap: u32, channel: &str, value: f64) -> TelemetrySample {
        TelemetrySample::new(Timestamp::from_millis(ms), vehicle, lap, channel, value)
    }

    #[test]
    fn reshape_groups_by_timestamp_and_sorts() -> TestResult {
        let set = SampleSet::long_format(vec![
            sample(80, "car-1", 3, "ath", 40.0),
            sample(0, "car-1", 3, "ath", 100.0),
            sample(40, "car-1", 3, "ath", 70.0),
            sample(0, "car-1", 3, "pbrake_f", 0.5),
            sample(40, "car-1", 3, "pbrake_f", 22.0),
        ]);

        let lap = reshape_lap(&set, "car-1", 3).ok_or("expected telemetry")?;
        assert_eq!(lap.len(), 3);
        assert_eq!(lap.trace("ath"), vec![Some(100.0), Some(70.0), Some(40.0)]);
        assert_eq!(lap.trace("pbrake_f"), vec![Some(0.5), Some(22.0), None]);
        assert!(
            lap.records()
                .windows(2)
                .all(|pair| matches!(pair, [a, b] if a.timestamp < b.timestamp))
        );
        Ok(())
    }

    #[test]
    fn reshape_keeps_first_duplicate_reading() -> TestResult {
        let set = SampleSet::long_format(vec![
            sample(0, "car-1", 1, "ath", 12.0),
            sample(0, "car-1", 1, "ath", 99.0),
        ]);
        let lap = reshape_lap(&set, "car-1", 1).ok_or("expected telemetry")?;
        assert_eq!(lap.value(0, "ath"), Some(12.0));
        Ok(())
    }

    #[test]
    fn reshape_filters_vehicle_and_lap() -> TestResult {
        let set = SampleSet::long_format(vec![
            sample(0, "car-1", 1, "ath", 1.0),
            sample(0, "car-2", 1, "ath", 2.0),
            sample(40, "car-1", 2, "ath", 3.0),
        ]);
        let lap = reshape_lap(&set, "car-1", 1).ok_or("expected telemetry")?;
        assert_eq!(lap.len(), 1);
        assert_eq!(lap.vehicle_id(), "car-1");
        assert_eq!(lap.lap(), 1);
        Ok(())
    }

    #[test]
    fn reshape_of_unknown_lap_is_empty_not_none() -> TestResult {
        let set = SampleSet::long_format(vec![sample(0, "car-1", 1, "ath", 1.0)]);
        let lap = reshape_lap(&set, "car-9", 1).ok_or("expected telemetry")?;
        assert!(lap.is_empty());
        Ok(())
    }

    #[test]
    fn reshape_rejects_non_telemetry_schema() {
        let set = SampleSet::with_schema(["vehicle_id", "best_lap"], Vec::new());
        assert!(!set.is_long_format());
        assert!(reshape_lap(&set, "car-1", 1).is_none());
    }

    #[test]
    fn lap_schema_is_union_of_channels() -> TestResult {
        let set = SampleSet::long_format(vec![
            sample(0, "car-1", 1, "ath", 1.0),
            sample(40, "car-1", 1, "accy_can", 0.3),
        ]);
        let lap = reshape_lap(&set, "car-1", 1).ok_or("expected telemetry")?;
        assert!(lap.has_field("ath"));
        assert!(lap.has_field("accy_can"));
        assert!(!lap.has_field("pbrake_f"));
        Ok(())
    }

    #[test]
    fn window_is_inclusive_and_clipped() {
        let lap = LapTelemetry::from_channel_traces(
            "car-1",
            1,
            [("ath", vec![Some(1.0), Some(2.0), None, Some(4.0)])],
        );
        assert_eq!(lap.window("ath", 1, 2), vec![Some(2.0), None]);
        assert_eq!(lap.window("ath", 2, 10), vec![None, Some(4.0)]);
    }

    #[test]
    fn sample_set_lists_laps() {
        let set = SampleSet::long_format(vec![
            sample(0, "car-2", 1, "ath", 1.0),
            sample(0, "car-1", 2, "ath", 1.0),
            sample(40, "car-1", 2, "ath", 1.0),
        ]);
        assert_eq!(
            set.laps(),
            vec![("car-1".to_string(), 2), ("car-2".to_string(), 1)]
        );
    }
}
