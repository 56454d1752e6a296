//! Dataset loading error types.
//!
//! Loading the source tables is the only fatal stage in the system: an
//! unreadable or structurally broken file stops the process before any
//! analysis runs.

use std::path::{Path, PathBuf};

/// Dataset loading errors.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A required dataset file does not exist
    #[error("Dataset file not found: {}", path.display())]
    MissingFile {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The file could not be opened or read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A CSV row could not be decoded into the expected record
    #[error("Malformed row {row} in {}: {reason}", path.display())]
    MalformedRow {
        /// Path being read
        path: PathBuf,
        /// 1-based data row number (header excluded)
        row: u64,
        /// Decoder message
        reason: String,
    },

    /// A required column is absent from the header
    #[error("Column '{column}' missing from {}", path.display())]
    MissingColumn {
        /// Path being read
        path: PathBuf,
        /// Column name
        column: String,
    },
}

impl DatasetError {
    /// Create a missing file error.
    pub fn missing_file(path: impl AsRef<Path>) -> Self {
        DatasetError::MissingFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a read error.
    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        DatasetError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a malformed row error.
    pub fn malformed_row(path: impl AsRef<Path>, row: u64, reason: impl Into<String>) -> Self {
        DatasetError::MalformedRow {
            path: path.as_ref().to_path_buf(),
            row,
            reason: reason.into(),
        }
    }

    /// Create a missing column error.
    pub fn missing_column(path: impl AsRef<Path>, column: impl Into<String>) -> Self {
        DatasetError::MissingColumn {
            path: path.as_ref().to_path_buf(),
            column: column.into(),
        }
    }
}
