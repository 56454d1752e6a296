//! Driver comparison and coaching for ApexCoach.
//!
//! Everything here is a pure function over an immutable dataset snapshot.
//! Empty inputs produce empty outputs; nothing in this crate fails.
//!
//! ## Modules
//! - `comparison` - Precomputed lookup with corner-feature fallback
//! - `diagnosis` - Issue classification and coaching advice
//! - `insights` - Loss severity, recoverable time and top opportunities
//! - `standings` - Leader gap, benchmark selection, feature ranking, summaries
//! - `what_if` - Linear lap time projection

#![deny(static_mut_refs)]
#![warn(missing_debug_implementations)]

pub mod comparison;
pub mod diagnosis;
pub mod insights;
pub mod standings;
pub mod what_if;

pub use comparison::{
    Comparison, ComparisonEngine, ComparisonQuery, ComparisonSource, CornerRange,
    SAMPLE_PERIOD_SECONDS, compare_drivers,
};
pub use diagnosis::{
    APEX_THROTTLE_DELTA_THRESHOLD, BRAKE_DELTA_THRESHOLD, CornerIssue, coaching_text, diagnose,
};
pub use insights::{
    CornerInsight, DEFAULT_TOP_OPPORTUNITIES, LossSeverity, corner_insights, estimated_distance_m,
    recoverable_time, top_opportunities,
};
pub use standings::{
    Benchmark, DEFAULT_TOP_FEATURES, DatasetSummary, DriverTimeLoss, LeaderGap, available_drivers,
    default_corner_range, driver_stat, fastest_driver, field_size, gap_to_leader,
    multi_driver_time_loss, style_label, top_features,
};
pub use what_if::{
    GAIN_PER_PERCENT, MAX_IMPROVEMENT_PCT, MIN_IMPROVEMENT_PCT, WhatIfProjection, project_what_if,
};
