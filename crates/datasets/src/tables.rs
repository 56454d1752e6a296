//! The precomputed dataset snapshot.

use crate::rows::{ClusterRow, ComparisonRow, FeatureRow, ImportanceRow, StatRow, TableRow};
use apexcoach_errors::DatasetError;
use apexcoach_telemetry_core::{
    ClusterLabel, ComparisonRecord, DriverCornerFeature, DriverStat, FeatureImportance,
};
use std::path::Path;

pub const CORNER_FEATURES_FILE: &str = FeatureRow::FILE_NAME;
pub const COMPARISONS_FILE: &str = ComparisonRow::FILE_NAME;
pub const DRIVER_STATS_FILE: &str = StatRow::FILE_NAME;
pub const DRIVER_CLUSTERS_FILE: &str = ClusterRow::FILE_NAME;
pub const FEATURE_IMPORTANCE_FILE: &str = ImportanceRow::FILE_NAME;

/// Every table the coaching layer reads. Loaded once; never mutated after.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub corner_features: Vec<DriverCornerFeature>,
    pub comparisons: Vec<ComparisonRecord>,
    pub driver_stats: Vec<DriverStat>,
    pub clusters: Vec<ClusterLabel>,
    pub feature_importance: Vec<FeatureImportance>,
}

impl Datasets {
    /// Load all five tables from `dir`. Any missing or unreadable table fails
    /// the whole load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let datasets = Self {
            corner_features: read_table::<FeatureRow>(dir)?,
            comparisons: read_table::<ComparisonRow>(dir)?,
            driver_stats: read_table::<StatRow>(dir)?,
            clusters: read_table::<ClusterRow>(dir)?,
            feature_importance: read_table::<ImportanceRow>(dir)?,
        };
        tracing::info!(
            dir = %dir.display(),
            corner_features = datasets.corner_features.len(),
            comparisons = datasets.comparisons.len(),
            driver_stats = datasets.driver_stats.len(),
            "loaded datasets"
        );
        Ok(datasets)
    }

    /// Write all five tables into `dir`, which must exist.
    pub fn write_dir(&self, dir: impl AsRef<Path>) -> Result<(), DatasetError> {
        let dir = dir.as_ref();
        write_table::<FeatureRow>(dir, &self.corner_features)?;
        write_table::<ComparisonRow>(dir, &self.comparisons)?;
        write_table::<StatRow>(dir, &self.driver_stats)?;
        write_table::<ClusterRow>(dir, &self.clusters)?;
        write_table::<ImportanceRow>(dir, &self.feature_importance)?;
        Ok(())
    }
}

fn read_table<R: TableRow>(dir: &Path) -> Result<Vec<R::Record>, DatasetError> {
    let path = dir.join(R::FILE_NAME);
    if !path.is_file() {
        return Err(DatasetError::missing_file(&path));
    }

    let mut reader = csv::Reader::from_path(&path).map_err(|err| csv_error(&path, 0, err))?;
    let headers = reader.headers().map_err(|err| csv_error(&path, 0, err))?.clone();
    if let Some(column) = R::REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(DatasetError::missing_column(&path, *column));
    }

    let mut records = Vec::new();
    for (row, result) in (1u64..).zip(reader.deserialize::<R>()) {
        let parsed = result.map_err(|err| csv_error(&path, row, err))?;
        records.push(parsed.into_record());
    }
    tracing::debug!(path = %path.display(), rows = records.len(), "read table");
    Ok(records)
}

fn write_table<R: TableRow>(dir: &Path, records: &[R::Record]) -> Result<(), DatasetError> {
    let path = dir.join(R::FILE_NAME);
    let mut writer = csv::Writer::from_path(&path).map_err(|err| csv_error(&path, 0, err))?;
    // Serialized rows carry the header; an empty table still needs one to load back.
    if records.is_empty() {
        writer
            .write_record(R::REQUIRED_COLUMNS)
            .map_err(|err| csv_error(&path, 0, err))?;
    }
    for (row, record) in (1u64..).zip(records) {
        writer
            .serialize(R::from_record(record))
            .map_err(|err| csv_error(&path, row, err))?;
    }
    writer.flush().map_err(|err| DatasetError::read(&path, err))
}

/// Map a csv error onto the dataset taxonomy. I/O failures stay I/O failures.
pub(crate) fn csv_error(path: &Path, row: u64, err: csv::Error) -> DatasetError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DatasetError::read(path, source),
        _ => DatasetError::malformed_row(path, row, reason),
    }
}
