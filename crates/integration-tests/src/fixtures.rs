//! A small synthetic field of GR86 laps on one track.

use apexcoach_datasets::{SyntheticLap, ThrottleDip, demo_lap, demo_rival_lap};
use apexcoach_telemetry_core::SampleSet;

pub const FIELD_TRACK: &str = "VIR";
pub const FAST_DRIVER: &str = "GR86-013-080";
pub const SLOW_DRIVER: &str = "GR86-002-000";
/// Brakes too little into T1 and picks up throttle too hard at the T2 apex.
pub const UNDER_BRAKING_DRIVER: &str = "GR86-021-113";

/// Fast, slow and under-braking laps, four corners each.
pub fn field() -> Vec<SyntheticLap> {
    vec![
        demo_lap(FAST_DRIVER),
        demo_rival_lap(SLOW_DRIVER),
        SyntheticLap::new(UNDER_BRAKING_DRIVER, 1, 620)
            .with_dip(ThrottleDip::new(50, 22, 15.0, 60.0))
            .with_dip(ThrottleDip::new(180, 14, 45.0, 60.0))
            .with_dip(ThrottleDip::new(300, 32, 5.0, 118.0))
            .with_dip(ThrottleDip::new(450, 12, 45.0, 30.0)),
    ]
}

/// All laps of the field in one long-format sample set.
pub fn field_samples(laps: &[SyntheticLap]) -> SampleSet {
    SampleSet::long_format(laps.iter().flat_map(SyntheticLap::samples).collect())
}
