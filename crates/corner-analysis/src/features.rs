//! Per-corner feature extraction.
//!
//! Throttle, front brake, lateral acceleration and steering are resolved
//! independently. A channel the lap does not carry contributes zeros to the
//! features that depend on it; the other features are unaffected.

use apexcoach_telemetry_core::{
    ChannelAliases, Corner, CornerFeature, LapTelemetry, LogicalChannel,
};

/// Front brake pressure above which a sample counts as braking.
pub const BRAKE_ACTIVE_THRESHOLD: f64 = 10.0;
/// Throttle level that marks the driver getting back on power.
pub const THROTTLE_APPLICATION_THRESHOLD: f64 = 50.0;

struct ResolvedChannels<'a> {
    throttle: Option<&'a str>,
    front_brake: Option<&'a str>,
    lateral_accel: Option<&'a str>,
    steering: Option<&'a str>,
}

impl<'a> ResolvedChannels<'a> {
    fn resolve(lap: &LapTelemetry, aliases: &'a ChannelAliases) -> Self {
        Self {
            throttle: aliases.resolve(lap, LogicalChannel::Throttle),
            front_brake: aliases.resolve(lap, LogicalChannel::FrontBrake),
            lateral_accel: aliases.resolve(lap, LogicalChannel::LateralAccel),
            steering: aliases.resolve(lap, LogicalChannel::SteeringAngle),
        }
    }
}

/// Extracts [`CornerFeature`]s using a given alias table.
#[derive(Debug, Clone, Copy)]
pub struct CornerFeatureExtractor<'a> {
    aliases: &'a ChannelAliases,
}

impl<'a> CornerFeatureExtractor<'a> {
    pub fn new(aliases: &'a ChannelAliases) -> Self {
        Self { aliases }
    }

    /// One feature vector per in-bounds corner, numbered densely from 1.
    pub fn extract(&self, lap: &LapTelemetry, corners: &[Corner]) -> Vec<CornerFeature> {
        let channels = ResolvedChannels::resolve(lap, self.aliases);
        let mut features = Vec::with_capacity(corners.len());
        let mut corner_num: u32 = 0;

        for corner in corners {
            if !corner.fits_within(lap.len()) {
                tracing::debug!(
                    start = corner.start,
                    end = corner.end,
                    rows = lap.len(),
                    "corner outside lap bounds, skipped"
                );
                continue;
            }
            corner_num = corner_num.saturating_add(1);
            features.push(corner_feature(lap, corner, corner_num, &channels));
        }

        features
    }
}

/// Extract features using the built-in channel aliases.
pub fn extract_corner_features(lap: &LapTelemetry, corners: &[Corner]) -> Vec<CornerFeature> {
    let aliases = ChannelAliases::default();
    CornerFeatureExtractor::new(&aliases).extract(lap, corners)
}

fn corner_feature(
    lap: &LapTelemetry,
    corner: &Corner,
    corner_num: u32,
    channels: &ResolvedChannels<'_>,
) -> CornerFeature {
    let Corner { start, apex, end } = *corner;

    let throttle_window = window(lap, channels.throttle, start, end);
    let brake_window = window(lap, channels.front_brake, start, end);
    let steering_window = window(lap, channels.steering, start, end);

    let throttle_application_point = throttle_window
        .iter()
        .position(|value| matches!(value, Some(v) if *v > THROTTLE_APPLICATION_THRESHOLD))
        .map_or(end, |offset| start.saturating_add(offset));

    CornerFeature {
        corner_num,
        start_idx: start,
        apex_idx: apex,
        end_idx: end,
        corner_duration: corner.len(),
        entry_throttle: value_or_zero(lap, channels.throttle, start),
        apex_throttle: value_or_zero(lap, channels.throttle, apex),
        min_throttle: present(&throttle_window).reduce(f64::min).unwrap_or(0.0),
        exit_throttle: value_or_zero(lap, channels.throttle, end),
        max_brake: present(&brake_window).reduce(f64::max).unwrap_or(0.0),
        brake_duration: present(&brake_window)
            .filter(|pressure| *pressure > BRAKE_ACTIVE_THRESHOLD)
            .count(),
        apex_lateral_g: value_or_zero(lap, channels.lateral_accel, apex).abs(),
        avg_steering_angle: mean(present(&steering_window).map(f64::abs)),
        throttle_application_point,
    }
}

/// Readings of an optional channel over `[start, end]`.
fn window(lap: &LapTelemetry, channel: Option<&str>, start: usize, end: usize) -> Vec<Option<f64>> {
    channel.map_or_else(Vec::new, |channel| lap.window(channel, start, end))
}

fn present(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().flatten().copied().filter(|v| !v.is_nan())
}

fn value_or_zero(lap: &LapTelemetry, channel: Option<&str>, index: usize) -> f64 {
    channel
        .and_then(|channel| lap.value(index, channel))
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| {
        (sum + v, count.saturating_add(1))
    });
    if count == 0 { 0.0 } else { sum / f64::from(count) }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn trace(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn full_lap() -> LapTelemetry {
        LapTelemetry::from_channel_traces(
            "car",
            1,
            [
                ("ath", trace(&[100.0, 100.0, 50.0, 40.0, 30.0, 45.0, 60.0, 90.0])),
                ("pbrake_f", trace(&[0.0, 2.0, 35.0, 60.0, 12.0, 4.0, 0.0, 0.0])),
                ("accy_can", trace(&[0.1, 0.2, 0.8, 1.1, -1.4, 1.0, 0.5, 0.1])),
                ("Steering_Angle", trace(&[0.0, 5.0, -20.0, -40.0, -60.0, -30.0, 10.0, 0.0])),
            ],
        )
    }

    #[test]
    fn features_for_single_corner() -> TestResult {
        let lap = full_lap();
        let features = extract_corner_features(&lap, &[Corner::new(2, 4, 7)]);
        let feature = features.first().ok_or("expected one feature")?;

        assert_eq!(feature.corner_num, 1);
        assert_eq!(feature.corner_duration, 5);
        assert!(approx(feature.entry_throttle, 50.0));
        assert!(approx(feature.apex_throttle, 30.0));
        assert!(approx(feature.min_throttle, 30.0));
        assert!(approx(feature.exit_throttle, 90.0));
        assert!(approx(feature.max_brake, 60.0));
        assert_eq!(feature.brake_duration, 3);
        assert!(approx(feature.apex_lateral_g, 1.4));
        // |-20| + |-40| + |-60| + |-30| + |10| + |0| over 6 samples
        assert!(approx(feature.avg_steering_angle, 160.0 / 6.0));
        assert_eq!(feature.throttle_application_point, 6);
        Ok(())
    }

    #[test]
    fn application_point_defaults_to_end_when_throttle_stays_low() -> TestResult {
        let lap = LapTelemetry::from_channel_traces(
            "car",
            1,
            [("ath", trace(&[100.0, 30.0, 20.0, 25.0, 40.0, 100.0]))],
        );
        let features = extract_corner_features(&lap, &[Corner::new(1, 2, 4)]);
        let feature = features.first().ok_or("expected one feature")?;
        assert_eq!(feature.throttle_application_point, 4);
        Ok(())
    }

    #[test]
    fn application_point_is_a_lap_index() -> TestResult {
        let lap = full_lap();
        let features = extract_corner_features(&lap, &[Corner::new(1, 4, 7)]);
        let feature = features.first().ok_or("expected one feature")?;
        // index 1 reads 100 which already exceeds 50
        assert_eq!(feature.throttle_application_point, 1);
        Ok(())
    }

    #[test]
    fn missing_channels_default_to_zero() -> TestResult {
        let lap = LapTelemetry::from_channel_traces(
            "car",
            1,
            [("ath", trace(&[100.0, 40.0, 30.0, 90.0]))],
        );
        let features = extract_corner_features(&lap, &[Corner::new(1, 2, 3)]);
        let feature = features.first().ok_or("expected one feature")?;
        assert!(approx(feature.max_brake, 0.0));
        assert_eq!(feature.brake_duration, 0);
        assert!(approx(feature.apex_lateral_g, 0.0));
        assert!(approx(feature.avg_steering_angle, 0.0));
        assert!(approx(feature.apex_throttle, 30.0));
        Ok(())
    }

    #[test]
    fn lap_without_throttle_still_yields_brake_features() -> TestResult {
        let lap = LapTelemetry::from_channel_traces(
            "car",
            1,
            [("brake_f", trace(&[0.0, 50.0, 80.0, 0.0]))],
        );
        let features = extract_corner_features(&lap, &[Corner::new(0, 1, 3)]);
        let feature = features.first().ok_or("expected one feature")?;
        assert!(approx(feature.entry_throttle, 0.0));
        assert!(approx(feature.min_throttle, 0.0));
        assert!(approx(feature.max_brake, 80.0));
        assert_eq!(feature.brake_duration, 2);
        assert_eq!(feature.throttle_application_point, 3);
        Ok(())
    }

    #[test]
    fn missing_readings_inside_window_are_skipped() -> TestResult {
        let lap = LapTelemetry::from_channel_traces(
            "car",
            1,
            [
                ("ath", vec![Some(100.0), None, Some(30.0), Some(60.0), Some(100.0)]),
                ("steer", vec![Some(0.0), Some(10.0), None, Some(-20.0), Some(0.0)]),
            ],
        );
        let features = extract_corner_features(&lap, &[Corner::new(1, 2, 4)]);
        let feature = features.first().ok_or("expected one feature")?;
        assert!(approx(feature.entry_throttle, 0.0));
        assert!(approx(feature.min_throttle, 30.0));
        assert!(approx(feature.avg_steering_angle, 10.0));
        assert_eq!(feature.throttle_application_point, 3);
        Ok(())
    }

    #[test]
    fn out_of_bounds_corners_are_dropped_and_numbering_stays_dense() {
        let lap = full_lap();
        let corners = [
            Corner::new(0, 1, 2),
            Corner::new(5, 6, 8),
            Corner::new(9, 9, 12),
            Corner::new(3, 4, 7),
        ];
        let features = extract_corner_features(&lap, &corners);
        let numbers: Vec<u32> = features.iter().map(|f| f.corner_num).collect();
        let starts: Vec<usize> = features.iter().map(|f| f.start_idx).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(starts, vec![0, 3]);
    }

    #[test]
    fn empty_lap_yields_nothing() {
        let lap = LapTelemetry::from_records("car", 1, Vec::new());
        assert!(extract_corner_features(&lap, &[Corner::new(0, 0, 0)]).is_empty());
    }
}
