//! Per-corner insights derived from comparison records.

use crate::diagnosis::{CornerIssue, coaching_text, diagnose};
use apexcoach_telemetry_core::ComparisonRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time lost above which a corner counts as a major loss.
pub const MAJOR_LOSS_SEC: f64 = 0.5;
/// Rough track distance covered per second lost, in metres.
pub const METRES_PER_SECOND_LOST: f64 = 8.0;
/// Opportunities surfaced when the caller does not ask for a count.
pub const DEFAULT_TOP_OPPORTUNITIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossSeverity {
    Major,
    Moderate,
    Gaining,
}

impl LossSeverity {
    pub fn classify(time_lost_sec: f64) -> Self {
        if time_lost_sec > MAJOR_LOSS_SEC {
            LossSeverity::Major
        } else if time_lost_sec > 0.0 {
            LossSeverity::Moderate
        } else {
            LossSeverity::Gaining
        }
    }
}

impl fmt::Display for LossSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LossSeverity::Major => "Major loss",
            LossSeverity::Moderate => "Moderate loss",
            LossSeverity::Gaining => "Gaining time",
        };
        f.write_str(label)
    }
}

pub fn estimated_distance_m(time_lost_sec: f64) -> f64 {
    (time_lost_sec * METRES_PER_SECOND_LOST).abs()
}

/// Total time that could be recovered across the records. Gains offset losses.
pub fn recoverable_time(records: &[ComparisonRecord]) -> f64 {
    records.iter().map(|record| record.time_lost_sec).sum()
}

/// The `n` records with the most time lost, largest first. Ties keep input order.
pub fn top_opportunities(records: &[ComparisonRecord], n: usize) -> Vec<&ComparisonRecord> {
    let mut ranked: Vec<&ComparisonRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.time_lost_sec.total_cmp(&a.time_lost_sec));
    ranked.truncate(n);
    ranked
}

/// Everything the coach has to say about one corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerInsight {
    pub record: ComparisonRecord,
    pub issue: CornerIssue,
    pub advice: String,
    pub severity: LossSeverity,
    pub distance_m: f64,
}

impl CornerInsight {
    pub fn from_record(record: &ComparisonRecord) -> Self {
        Self {
            record: record.clone(),
            issue: diagnose(record),
            advice: coaching_text(record).to_string(),
            severity: LossSeverity::classify(record.time_lost_sec),
            distance_m: estimated_distance_m(record.time_lost_sec),
        }
    }
}

/// Insights for every record, ordered by corner number.
pub fn corner_insights(records: &[ComparisonRecord]) -> Vec<CornerInsight> {
    let mut insights: Vec<CornerInsight> = records.iter().map(CornerInsight::from_record).collect();
    insights.sort_by_key(|insight| insight.record.corner);
    insights
}
