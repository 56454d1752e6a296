//! Corner segmentation and corner feature extraction.
//!
//! A corner is a stretch of a lap where the throttle sits below a threshold.
//! [`segmenter`] finds those stretches with a two-state scan over the throttle
//! trace; [`features`] turns each one into a fixed feature vector.
//!
//! # Example
//!
//! ```
//! use apexcoach_corner_analysis::{SegmentationConfig, analyze_lap};
//! use apexcoach_telemetry_core::{ChannelAliases, LapTelemetry};
//!
//! let throttle = [100.0, 100.0, 50.0, 40.0, 30.0, 45.0, 60.0, 90.0];
//! let lap = LapTelemetry::from_channel_traces(
//!     "GR86-002-000",
//!     4,
//!     [("ath", throttle.iter().copied().map(Some).collect())],
//! );
//! let config = SegmentationConfig { throttle_threshold: 80.0, min_corner_length: 2 };
//!
//! let features = analyze_lap(&lap, &config, &ChannelAliases::default());
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].apex_idx, 4);
//! ```

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_debug_implementations)]

pub mod features;
pub mod segmenter;

pub use features::{
    BRAKE_ACTIVE_THRESHOLD, CornerFeatureExtractor, THROTTLE_APPLICATION_THRESHOLD,
    extract_corner_features,
};
pub use segmenter::{
    CornerSegmenter, DEFAULT_MIN_CORNER_LENGTH, DEFAULT_THROTTLE_THRESHOLD, MISSING_THROTTLE_FILL,
    SegmentationConfig, detect_corners, segment_throttle_trace,
};

use apexcoach_telemetry_core::{ChannelAliases, CornerFeature, LapTelemetry};

/// Segment a lap and extract one feature vector per surviving corner.
pub fn analyze_lap(
    lap: &LapTelemetry,
    config: &SegmentationConfig,
    aliases: &ChannelAliases,
) -> Vec<CornerFeature> {
    let corners = CornerSegmenter::new(*config, aliases).detect(lap);
    CornerFeatureExtractor::new(aliases).extract(lap, &corners)
}
