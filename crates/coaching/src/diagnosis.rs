//! Corner issue classification and coaching advice.
//!
//! Rules are checked in a fixed order and the first match wins: a brake
//! delta beyond [`BRAKE_DELTA_THRESHOLD`] always pre-empts the throttle rule.

use apexcoach_telemetry_core::ComparisonRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Brake pressure difference (slow - fast) beyond which braking is the issue.
pub const BRAKE_DELTA_THRESHOLD: f64 = 20.0;
/// Apex throttle difference (slow - fast), in percent, beyond which throttle is the issue.
pub const APEX_THROTTLE_DELTA_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerIssue {
    OverBraking,
    UnderBraking,
    LateThrottle,
    AggressiveThrottle,
    InconsistentSpeed,
}

impl CornerIssue {
    pub fn label(self) -> &'static str {
        match self {
            CornerIssue::OverBraking => "Over-braking",
            CornerIssue::UnderBraking => "Under-braking",
            CornerIssue::LateThrottle => "Late throttle application",
            CornerIssue::AggressiveThrottle => "Too aggressive on throttle",
            CornerIssue::InconsistentSpeed => "Inconsistent corner speed",
        }
    }
}

impl fmt::Display for CornerIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a comparison record by its deltas.
pub fn diagnose(record: &ComparisonRecord) -> CornerIssue {
    classify(record.brake_delta, record.apex_throttle_delta)
}

fn classify(brake_delta: f64, apex_throttle_delta: f64) -> CornerIssue {
    if brake_delta.abs() > BRAKE_DELTA_THRESHOLD {
        if brake_delta > 0.0 {
            CornerIssue::OverBraking
        } else {
            CornerIssue::UnderBraking
        }
    } else if apex_throttle_delta.abs() > APEX_THROTTLE_DELTA_THRESHOLD {
        if apex_throttle_delta < 0.0 {
            CornerIssue::LateThrottle
        } else {
            CornerIssue::AggressiveThrottle
        }
    } else {
        CornerIssue::InconsistentSpeed
    }
}

/// Advice matching the record's deltas.
pub fn coaching_text(record: &ComparisonRecord) -> &'static str {
    if record.brake_delta > BRAKE_DELTA_THRESHOLD {
        "Brake lighter, carry more speed"
    } else if record.brake_delta < -BRAKE_DELTA_THRESHOLD {
        "Brake harder and later"
    } else if record.apex_throttle_delta < -APEX_THROTTLE_DELTA_THRESHOLD {
        "Get on throttle earlier at apex"
    } else if record.apex_throttle_delta > APEX_THROTTLE_DELTA_THRESHOLD {
        "Smoother throttle application"
    } else {
        "Focus on entry consistency"
    }
}
