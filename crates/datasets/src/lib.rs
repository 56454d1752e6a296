//! Dataset loading for ApexCoach.
//!
//! Reads the precomputed CSV tables into an immutable [`Datasets`] snapshot
//! and raw long-format telemetry into a [`SampleSet`]. Loading is the only
//! place in the system that can fail fatally.
//!
//! ## Modules
//! - `tables` - The five precomputed tables
//! - `raw` - Long-format telemetry files
//! - `fixtures` - Synthetic laps for tests and demos
//!
//! [`SampleSet`]: apexcoach_telemetry_core::SampleSet

#![deny(static_mut_refs)]
#![warn(missing_debug_implementations)]

pub mod fixtures;
pub mod raw;
mod rows;
pub mod tables;

pub use fixtures::{
    DIP_ENTRY_THROTTLE, SAMPLE_PERIOD_MS, SyntheticLap, ThrottleDip, demo_lap, demo_rival_lap,
};
pub use raw::{format_timestamp, load_sample_set, parse_timestamp, write_sample_set};
pub use tables::{
    COMPARISONS_FILE, CORNER_FEATURES_FILE, DRIVER_CLUSTERS_FILE, DRIVER_STATS_FILE,
    Datasets, FEATURE_IMPORTANCE_FILE,
};
