//! Synthetic lap fixtures.
//!
//! A synthetic lap is full throttle everywhere except inside configured
//! throttle dips. Each dip lifts to [`DIP_ENTRY_THROTTLE`] at its edges and
//! bottoms out at its minimum in the middle, so a dip of length `n` starting
//! at `s` segments (threshold 80) into a corner `s..s+n` with its apex at the
//! dip's midpoint.

use apexcoach_telemetry_core::{SampleSet, TelemetrySample, Timestamp};

/// Sample spacing of generated laps (25 Hz).
pub const SAMPLE_PERIOD_MS: i64 = 40;
/// Throttle at the edges of every dip.
pub const DIP_ENTRY_THROTTLE: f64 = 60.0;

const THROTTLE: &str = "ath";
const FRONT_BRAKE: &str = "pbrake_f";
const LATERAL_ACCEL: &str = "accy_can";
const STEERING: &str = "Steering_Angle";

const PEAK_LATERAL_G: f64 = 1.4;
const PEAK_STEERING_DEG: f64 = 60.0;

fn real(n: usize) -> f64 {
    u32::try_from(n).map_or(f64::from(u32::MAX), f64::from)
}

/// One throttle lift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleDip {
    pub start: usize,
    pub length: usize,
    pub min_throttle: f64,
    /// Front brake pressure held over the first third of the dip.
    pub peak_brake: f64,
}

impl ThrottleDip {
    pub fn new(start: usize, length: usize, min_throttle: f64, peak_brake: f64) -> Self {
        Self {
            start,
            length,
            min_throttle,
            peak_brake,
        }
    }

    /// Index of the lowest throttle sample.
    pub fn apex(&self) -> usize {
        self.start.saturating_add(self.length.saturating_sub(1) / 2)
    }

    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }

    /// Shape in `[0, 1]`: 1 at the apex, falling linearly to 0 at the edges.
    fn intensity(&self, offset: usize) -> f64 {
        let mid = self.length.saturating_sub(1) / 2;
        let half = self.length.saturating_sub(1).saturating_sub(mid).max(1);
        1.0 - real(offset.abs_diff(mid)) / real(half)
    }
}

#[derive(Debug, Clone, Copy)]
struct Reading {
    throttle: f64,
    brake: f64,
    lateral_g: f64,
    steering: f64,
}

impl Reading {
    const STRAIGHT: Reading = Reading {
        throttle: 100.0,
        brake: 0.0,
        lateral_g: 0.0,
        steering: 0.0,
    };
}

/// Builder for a synthetic lap of one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticLap {
    vehicle_id: String,
    lap: u32,
    samples: usize,
    start: Timestamp,
    dips: Vec<ThrottleDip>,
}

impl SyntheticLap {
    pub fn new(vehicle_id: impl Into<String>, lap: u32, samples: usize) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            lap,
            samples,
            start: Timestamp::from_micros(0),
            dips: Vec::new(),
        }
    }

    pub fn starting_at(mut self, start: Timestamp) -> Self {
        self.start = start;
        self
    }

    pub fn with_dip(mut self, dip: ThrottleDip) -> Self {
        self.dips.push(dip);
        self
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn lap(&self) -> u32 {
        self.lap
    }

    pub fn dips(&self) -> &[ThrottleDip] {
        &self.dips
    }

    /// Lap time implied by the sample count.
    pub fn lap_time_sec(&self) -> f64 {
        real(self.samples) * 0.04
    }

    fn readings(&self) -> Vec<Reading> {
        let mut readings = vec![Reading::STRAIGHT; self.samples];
        for (turn, dip) in self.dips.iter().enumerate() {
            let direction = if turn % 2 == 0 { 1.0 } else { -1.0 };
            let braking_samples = dip.length / 3;
            let window = readings.iter_mut().skip(dip.start).take(dip.length);
            for (offset, reading) in window.enumerate() {
                let intensity = dip.intensity(offset);
                let throttle_drop = (DIP_ENTRY_THROTTLE - dip.min_throttle) * (1.0 - intensity);
                *reading = Reading {
                    throttle: dip.min_throttle + throttle_drop,
                    brake: if offset < braking_samples { dip.peak_brake } else { 0.0 },
                    lateral_g: direction * PEAK_LATERAL_G * intensity,
                    steering: direction * PEAK_STEERING_DEG * intensity,
                };
            }
        }
        readings
    }

    pub fn throttle_trace(&self) -> Vec<f64> {
        self.readings().iter().map(|reading| reading.throttle).collect()
    }

    /// Long-format samples, four channels per timestamp.
    pub fn samples(&self) -> Vec<TelemetrySample> {
        let mut samples = Vec::with_capacity(self.samples.saturating_mul(4));
        for (index, reading) in self.readings().into_iter().enumerate() {
            let offset_ms = i64::try_from(index)
                .unwrap_or(i64::MAX)
                .saturating_mul(SAMPLE_PERIOD_MS);
            let timestamp = Timestamp::from_micros(
                self.start
                    .as_micros()
                    .saturating_add(offset_ms.saturating_mul(1_000)),
            );
            for (channel, value) in [
                (THROTTLE, reading.throttle),
                (FRONT_BRAKE, reading.brake),
                (LATERAL_ACCEL, reading.lateral_g),
                (STEERING, reading.steering),
            ] {
                samples.push(TelemetrySample::new(
                    timestamp,
                    self.vehicle_id.as_str(),
                    self.lap,
                    channel,
                    value,
                ));
            }
        }
        samples
    }

    pub fn sample_set(&self) -> SampleSet {
        SampleSet::long_format(self.samples())
    }
}

/// A 24 second lap with four corners of varying severity.
pub fn demo_lap(vehicle_id: &str) -> SyntheticLap {
    SyntheticLap::new(vehicle_id, 1, 600)
        .with_dip(ThrottleDip::new(50, 20, 15.0, 95.0))
        .with_dip(ThrottleDip::new(180, 14, 35.0, 60.0))
        .with_dip(ThrottleDip::new(300, 30, 5.0, 120.0))
        .with_dip(ThrottleDip::new(450, 12, 45.0, 30.0))
}

/// A slower version of [`demo_lap`]: longer corners, heavier braking, a
/// later throttle pickup.
pub fn demo_rival_lap(vehicle_id: &str) -> SyntheticLap {
    SyntheticLap::new(vehicle_id, 1, 640)
        .with_dip(ThrottleDip::new(50, 26, 10.0, 125.0))
        .with_dip(ThrottleDip::new(185, 16, 25.0, 62.0))
        .with_dip(ThrottleDip::new(310, 31, 5.0, 110.0))
        .with_dip(ThrottleDip::new(470, 12, 52.0, 28.0))
}
