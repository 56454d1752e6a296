//! End-to-end test harness for ApexCoach
//!
//! Drives raw long-format telemetry through the whole analysis chain
//! (reshape, segment, extract, compare, diagnose) so the tests in `tests/`
//! can check cross-crate behaviour on realistic synthetic fields.

#![deny(rust_2018_idioms)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::print_stdout)]

pub mod fixtures;
pub mod pipeline;

pub use fixtures::{
    FAST_DRIVER, FIELD_TRACK, SLOW_DRIVER, UNDER_BRAKING_DRIVER, field, field_samples,
};
pub use pipeline::{
    CoachingRun, coach, field_datasets, lap_features, sample_set_features, stats_for,
};
