//! Core telemetry types, channel resolution and lap reshaping.
//!
//! This crate holds the data model shared by every ApexCoach crate and the
//! two leaf stages of the analysis pipeline.
//!
//! ## Modules
//! - `model` - Samples, corners, corner features, comparison records and driver context
//! - `channels` - Logical channels, alias priority lists and the channel resolver
//! - `reshape` - Long-format sample sets and the lap reshaper

#![deny(static_mut_refs)]

pub mod channels;
pub mod model;
pub mod reshape;

pub use channels::{
    ChannelAliases, ChannelCoverage, FieldSchema, LogicalChannel, resolve_channel,
};
pub use model::{
    ClusterLabel, ComparisonRecord, Corner, CornerFeature, DriverCornerFeature, DriverStat,
    FeatureImportance, TelemetrySample, Timestamp,
};
pub use reshape::{
    CHANNEL_NAME_FIELD, CHANNEL_VALUE_FIELD, LONG_FORMAT_FIELDS, LapRecord, LapTelemetry, SampleSet,
    reshape_lap,
};
