//! Raw long-format telemetry files.
//!
//! One row per `(timestamp, channel)` reading. Timestamps are RFC 3339
//! strings as exported by the timing system, or integer microseconds.

use crate::rows::parse_count;
use crate::tables::csv_error;
use apexcoach_errors::DatasetError;
use apexcoach_telemetry_core::{
    CHANNEL_NAME_FIELD, CHANNEL_VALUE_FIELD, LONG_FORMAT_FIELDS, SampleSet, TelemetrySample,
    Timestamp,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

/// Parse an RFC 3339 timestamp or a plain integer count of microseconds.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if let Ok(micros) = text.parse::<i64>() {
        return Some(Timestamp::from_micros(micros));
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|time| Timestamp::from_micros(time.timestamp_micros()))
}

/// Render a timestamp as RFC 3339 UTC with microsecond precision.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_micros(timestamp.as_micros()).map_or_else(
        || timestamp.as_micros().to_string(),
        |time| time.to_rfc3339_opts(SecondsFormat::Micros, true),
    )
}

struct Columns {
    timestamp: usize,
    vehicle_id: usize,
    lap: usize,
    name: usize,
    value: usize,
}

/// Load a long-format telemetry CSV.
///
/// The header becomes the sample set's schema. A file without channel
/// name/value columns loads as an empty set with that schema, which the lap
/// reshaper reports as "not telemetry". Rows with unparseable values are
/// skipped.
pub fn load_sample_set(path: impl AsRef<Path>) -> Result<SampleSet, DatasetError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DatasetError::missing_file(path));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|err| csv_error(path, 0, err))?;
    let headers = reader.headers().map_err(|err| csv_error(path, 0, err))?.clone();
    let position = |column: &str| headers.iter().position(|header| header.trim() == column);

    let (Some(name), Some(value)) = (position(CHANNEL_NAME_FIELD), position(CHANNEL_VALUE_FIELD))
    else {
        tracing::debug!(
            path = %path.display(),
            "no channel name/value columns, not long-format telemetry"
        );
        return Ok(SampleSet::with_schema(headers.iter().map(str::trim), Vec::new()));
    };
    let column =
        |field: &str| position(field).ok_or_else(|| DatasetError::missing_column(path, field));
    let columns = Columns {
        timestamp: column("timestamp")?,
        vehicle_id: column("vehicle_id")?,
        lap: column("lap")?,
        name,
        value,
    };

    let mut samples = Vec::new();
    let mut skipped = 0usize;
    for (row, result) in (1u64..).zip(reader.records()) {
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(csv_error(path, row, err)),
            Err(err) => {
                tracing::debug!(row, error = %err, "unreadable telemetry row skipped");
                skipped = skipped.saturating_add(1);
                continue;
            }
        };
        match parse_sample(&record, &columns) {
            Some(sample) => samples.push(sample),
            None => {
                tracing::debug!(row, "telemetry row with missing or non-numeric fields skipped");
                skipped = skipped.saturating_add(1);
            }
        }
    }

    tracing::info!(
        path = %path.display(),
        samples = samples.len(),
        skipped,
        "loaded raw telemetry"
    );
    Ok(SampleSet::with_schema(headers.iter().map(str::trim), samples))
}

fn parse_sample(record: &csv::StringRecord, columns: &Columns) -> Option<TelemetrySample> {
    let timestamp = parse_timestamp(record.get(columns.timestamp)?)?;
    let vehicle_id = record.get(columns.vehicle_id)?.trim();
    let lap = parse_count(record.get(columns.lap)?)?;
    let channel = record.get(columns.name)?.trim();
    let value: f64 = record.get(columns.value)?.trim().parse().ok()?;
    if vehicle_id.is_empty() || channel.is_empty() || value.is_nan() {
        return None;
    }
    Some(TelemetrySample::new(timestamp, vehicle_id, lap, channel, value))
}

/// Write samples as a long-format telemetry CSV.
pub fn write_sample_set(
    path: impl AsRef<Path>,
    samples: &[TelemetrySample],
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).map_err(|err| csv_error(path, 0, err))?;
    writer
        .write_record(LONG_FORMAT_FIELDS)
        .map_err(|err| csv_error(path, 0, err))?;
    for (row, sample) in (1u64..).zip(samples) {
        writer
            .write_record([
                format_timestamp(sample.timestamp),
                sample.vehicle_id.clone(),
                sample.lap.to_string(),
                sample.channel.clone(),
                sample.value.to_string(),
            ])
            .map_err(|err| csv_error(path, row, err))?;
    }
    writer.flush().map_err(|err| DatasetError::read(path, err))
}
