//! Linear lap time projection.

use serde::{Deserialize, Serialize};

/// Seconds gained per percent of improvement.
pub const GAIN_PER_PERCENT: f64 = 0.12;
/// Lowest improvement the front end accepts.
pub const MIN_IMPROVEMENT_PCT: f64 = 0.0;
/// Highest improvement the front end accepts.
pub const MAX_IMPROVEMENT_PCT: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhatIfProjection {
    pub improvement_pct: f64,
    pub current_best_sec: f64,
    pub gain_sec: f64,
    pub projected_lap_sec: f64,
}

/// Project a lap time after an improvement of `improvement_pct` percent.
///
/// No clamping happens here; callers restrict the input domain.
pub fn project_what_if(improvement_pct: f64, current_best_sec: f64) -> WhatIfProjection {
    let gain_sec = improvement_pct * GAIN_PER_PERCENT;
    WhatIfProjection {
        improvement_pct,
        current_best_sec,
        gain_sec,
        projected_lap_sec: current_best_sec - gain_sec,
    }
}
