//! Analysis configuration for ApexCoach.
//!
//! This crate combines:
//! - Embedded analysis defaults (segmentation parameters, channel aliases)
//! - Track profiles with plausibility ranges and race data locations

pub mod analysis;
pub mod tracks;

pub use analysis::{
    ANALYSIS_DEFAULTS_YAML, AnalysisConfig, ConfigError, load_config_file, load_default_config,
};
pub use tracks::TrackProfile;
