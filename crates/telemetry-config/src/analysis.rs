//! Analysis configuration: segmentation parameters, channel aliases and
//! track profiles.

use crate::tracks::TrackProfile;
use apexcoach_corner_analysis::SegmentationConfig;
use apexcoach_errors::ValidationError;
use apexcoach_telemetry_core::{ChannelAliases, LogicalChannel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const ANALYSIS_DEFAULTS_YAML: &str = include_str!("analysis_defaults.yaml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse analysis config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid analysis config: {0}")]
    Invalid(#[from] ValidationError),
}

/// Full analysis configuration. Sections missing from a YAML document take
/// their defaults; a missing `tracks` section means no track profiles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub segmentation: SegmentationConfig,
    pub channels: ChannelAliases,
    pub tracks: BTreeMap<String, TrackProfile>,
}

/// Load the embedded default configuration.
pub fn load_default_config() -> Result<AnalysisConfig, ConfigError> {
    Ok(serde_yaml::from_str(ANALYSIS_DEFAULTS_YAML)?)
}

/// Load and validate a configuration file. The file replaces the defaults
/// wholesale.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AnalysisConfig = serde_yaml::from_str(&text)?;
    config.validate()?;
    tracing::info!(
        path = %path.display(),
        tracks = config.tracks.len(),
        "loaded analysis config"
    );
    Ok(config)
}

impl AnalysisConfig {
    /// Check parameters the analysis relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let threshold = self.segmentation.throttle_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ValidationError::out_of_range(
                "segmentation.throttle_threshold",
                threshold,
                0.0,
                100.0,
            ));
        }
        if self.segmentation.min_corner_length == 0 {
            return Err(ValidationError::out_of_range(
                "segmentation.min_corner_length",
                0,
                1,
                usize::MAX,
            ));
        }

        for channel in LogicalChannel::ALL {
            if self.channels.aliases(channel).is_empty() {
                return Err(ValidationError::required(format!("channels.{channel}")));
            }
        }

        for (name, track) in &self.tracks {
            let (low, high) = track.expected_corners;
            if low > high {
                return Err(ValidationError::inverted_range(
                    format!("tracks.{name}.expected_corners"),
                    low,
                    high,
                ));
            }
            let (fastest, slowest) = track.typical_lap_time;
            if fastest.is_nan() || slowest.is_nan() || fastest > slowest {
                return Err(ValidationError::inverted_range(
                    format!("tracks.{name}.typical_lap_time"),
                    fastest,
                    slowest,
                ));
            }
        }

        Ok(())
    }

    pub fn track(&self, name: &str) -> Option<&TrackProfile> {
        self.tracks.get(name)
    }

    /// Track names in sorted order.
    pub fn track_names(&self) -> Vec<&str> {
        self.tracks.keys().map(String::as_str).collect()
    }
}
