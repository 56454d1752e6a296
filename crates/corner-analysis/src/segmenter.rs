//! Throttle-threshold corner segmentation.
//!
//! The scan walks the throttle trace once, left to right, in one of two
//! states. `Open` moves to `InCorner` when throttle drops below the threshold;
//! `InCorner` closes the corner on the first sample back at or above it. A
//! closed candidate shorter than the minimum length is noise and is dropped.
//! A lap that ends while still `InCorner` produces nothing for that stretch:
//! a corner only counts once throttle recovery has been observed.

use apexcoach_telemetry_core::{ChannelAliases, Corner, LapTelemetry, LogicalChannel};
use serde::{Deserialize, Serialize};

/// Throttle level (same unit as the channel, usually 0-100) below which a sample is in a corner.
pub const DEFAULT_THROTTLE_THRESHOLD: f64 = 80.0;
/// Minimum corner length in samples.
pub const DEFAULT_MIN_CORNER_LENGTH: usize = 10;
/// Value substituted for missing throttle readings (fully open).
pub const MISSING_THROTTLE_FILL: f64 = 100.0;

/// Segmentation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub throttle_threshold: f64,
    pub min_corner_length: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            throttle_threshold: DEFAULT_THROTTLE_THRESHOLD,
            min_corner_length: DEFAULT_MIN_CORNER_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Open,
    InCorner { start: usize },
}

/// Segment a filled throttle trace into corners.
pub fn segment_throttle_trace(throttle: &[f64], config: &SegmentationConfig) -> Vec<Corner> {
    let mut corners = Vec::new();
    let mut state = ScanState::Open;

    for (index, &value) in throttle.iter().enumerate() {
        let lifted = value < config.throttle_threshold;
        state = match (state, lifted) {
            (ScanState::Open, true) => ScanState::InCorner { start: index },
            (ScanState::Open, false) => ScanState::Open,
            (ScanState::InCorner { start }, true) => ScanState::InCorner { start },
            (ScanState::InCorner { start }, false) => {
                let length = index.saturating_sub(start);
                if length >= config.min_corner_length {
                    let apex = apex_index(throttle, start, index);
                    corners.push(Corner::new(start, apex, index));
                } else {
                    tracing::trace!(
                        start,
                        end = index,
                        length,
                        "discarding short corner candidate"
                    );
                }
                ScanState::Open
            }
        };
    }

    if let ScanState::InCorner { start } = state {
        tracing::debug!(start, "lap ended inside a corner, trailing candidate dropped");
    }

    corners
}

/// First position of the minimum throttle within `[start, end)`.
fn apex_index(throttle: &[f64], start: usize, end: usize) -> usize {
    let mut apex = start;
    let mut lowest = f64::INFINITY;
    for (offset, &value) in throttle.get(start..end).unwrap_or_default().iter().enumerate() {
        if value < lowest {
            lowest = value;
            apex = start.saturating_add(offset);
        }
    }
    apex
}

/// Corner detector bound to a configuration and an alias table.
#[derive(Debug, Clone, Copy)]
pub struct CornerSegmenter<'a> {
    config: SegmentationConfig,
    aliases: &'a ChannelAliases,
}

impl<'a> CornerSegmenter<'a> {
    pub fn new(config: SegmentationConfig, aliases: &'a ChannelAliases) -> Self {
        Self { config, aliases }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Detect corners in a lap. A lap without a resolvable throttle channel
    /// yields no corners.
    pub fn detect(&self, lap: &LapTelemetry) -> Vec<Corner> {
        let Some(throttle_channel) = self.aliases.resolve(lap, LogicalChannel::Throttle) else {
            tracing::debug!(
                vehicle_id = lap.vehicle_id(),
                lap = lap.lap(),
                "no throttle channel, lap skipped"
            );
            return Vec::new();
        };

        let throttle: Vec<f64> = lap
            .trace(throttle_channel)
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()).unwrap_or(MISSING_THROTTLE_FILL))
            .collect();

        let corners = segment_throttle_trace(&throttle, &self.config);
        tracing::debug!(
            vehicle_id = lap.vehicle_id(),
            lap = lap.lap(),
            channel = throttle_channel,
            corners = corners.len(),
            "segmented lap"
        );
        corners
    }
}

/// Detect corners using the built-in channel aliases.
pub fn detect_corners(lap: &LapTelemetry, config: &SegmentationConfig) -> Vec<Corner> {
    let aliases = ChannelAliases::default();
    CornerSegmenter::new(*config, &aliases).detect(lap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIP: [f64; 8] = [100.0, 100.0, 50.0, 40.0, 30.0, 45.0, 60.0, 90.0];

    fn config(threshold: f64, min_len: usize) -> SegmentationConfig {
        SegmentationConfig {
            throttle_threshold: threshold,
            min_corner_length: min_len,
        }
    }

    fn lap_with(channel: &str, trace: Vec<Option<f64>>) -> LapTelemetry {
        LapTelemetry::from_channel_traces("car", 1, [(channel, trace)])
    }

    #[test]
    fn single_dip_produces_one_corner() {
        // closes at index 7, the first sample back at or above 80
        let corners = segment_throttle_trace(&DIP, &config(80.0, 2));
        assert_eq!(corners, vec![Corner::new(2, 4, 7)]);
    }

    #[test]
    fn short_candidate_is_discarded() {
        assert!(segment_throttle_trace(&DIP, &config(80.0, 6)).is_empty());
    }

    #[test]
    fn minimum_length_is_inclusive() {
        assert_eq!(segment_throttle_trace(&DIP, &config(80.0, 5)).len(), 1);
    }

    #[test]
    fn trailing_open_corner_is_dropped() {
        let trace = [100.0, 100.0, 20.0, 10.0, 5.0, 5.0, 5.0];
        assert!(segment_throttle_trace(&trace, &config(80.0, 1)).is_empty());
    }

    #[test]
    fn throttle_at_threshold_closes_corner() {
        let trace = [100.0, 79.9, 70.0, 80.0, 100.0];
        assert_eq!(
            segment_throttle_trace(&trace, &config(80.0, 1)),
            vec![Corner::new(1, 2, 3)]
        );
    }

    #[test]
    fn apex_takes_first_minimum() {
        let trace = [100.0, 30.0, 20.0, 20.0, 50.0, 100.0];
        let corners = segment_throttle_trace(&trace, &config(80.0, 1));
        assert_eq!(corners, vec![Corner::new(1, 2, 5)]);
    }

    #[test]
    fn corners_come_out_in_start_order() {
        let trace = [
            100.0, 40.0, 30.0, 100.0, 100.0, 20.0, 10.0, 15.0, 100.0, 60.0, 100.0,
        ];
        let corners = segment_throttle_trace(&trace, &config(80.0, 2));
        assert_eq!(
            corners,
            vec![Corner::new(1, 2, 3), Corner::new(5, 6, 8)]
        );
    }

    #[test]
    fn lap_starting_in_corner_is_detected_from_index_zero() {
        let trace = [10.0, 20.0, 30.0, 90.0];
        assert_eq!(
            segment_throttle_trace(&trace, &config(80.0, 3)),
            vec![Corner::new(0, 0, 3)]
        );
    }

    #[test]
    fn detect_resolves_throttle_alias() {
        let lap = lap_with("TPS", DIP.iter().copied().map(Some).collect());
        assert_eq!(detect_corners(&lap, &config(80.0, 2)).len(), 1);
    }

    #[test]
    fn missing_throttle_channel_yields_no_corners() {
        let lap = lap_with("pbrake_f", vec![Some(0.0); 30]);
        assert!(detect_corners(&lap, &SegmentationConfig::default()).is_empty());
    }

    #[test]
    fn missing_samples_count_as_open_throttle() {
        let mut trace: Vec<Option<f64>> = DIP.iter().copied().map(Some).collect();
        // a gap inside the straight must not open a corner
        trace.insert(1, None);
        let lap = lap_with("ath", trace);
        assert_eq!(
            detect_corners(&lap, &config(80.0, 2)),
            vec![Corner::new(3, 5, 8)]
        );
    }

    #[test]
    fn gap_inside_corner_closes_it() {
        let trace = vec![Some(100.0), Some(30.0), Some(20.0), None, Some(10.0), Some(100.0)];
        let lap = lap_with("ath", trace);
        assert_eq!(
            detect_corners(&lap, &config(80.0, 1)),
            vec![Corner::new(1, 2, 3), Corner::new(4, 4, 5)]
        );
    }

    #[test]
    fn custom_aliases_are_honoured() {
        let aliases = ChannelAliases {
            throttle: vec!["pedal".to_string()],
            ..ChannelAliases::default()
        };
        let lap = lap_with("pedal", DIP.iter().copied().map(Some).collect());
        let segmenter = CornerSegmenter::new(config(80.0, 2), &aliases);
        assert_eq!(segmenter.detect(&lap), vec![Corner::new(2, 4, 7)]);
    }

    #[test]
    fn default_config_matches_documented_values() {
        let config = SegmentationConfig::default();
        assert_eq!(config.min_corner_length, 10);
        assert!((config.throttle_threshold - 80.0).abs() < f64::EPSILON);
    }
}
