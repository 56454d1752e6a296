//! Standings: dataset summary, leader, per-driver context and top features.

use crate::commands::{CommandEnv, StandingsArgs, load_datasets};
use crate::output;
use anyhow::Result;
use apexcoach_coaching::{
    DatasetSummary, LeaderGap, fastest_driver, field_size, gap_to_leader, style_label, top_features,
};
use apexcoach_datasets::Datasets;
use apexcoach_telemetry_core::DriverStat;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StandingRow {
    pub driver: String,
    pub track: String,
    pub best_lap_sec: f64,
    pub rank: u32,
    pub field_size: usize,
    pub percentile: f64,
    pub gap_to_leader: Option<LeaderGap>,
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeatureRanking {
    pub feature: String,
    pub display_name: String,
    pub importance: f64,
}

#[derive(Debug, Serialize)]
pub struct StandingsReport {
    pub track: Option<String>,
    pub summary: DatasetSummary,
    pub leader: Option<DriverStat>,
    pub drivers: Vec<StandingRow>,
    pub top_features: Vec<FeatureRanking>,
}

impl StandingsReport {
    pub fn build(datasets: &Datasets, track: Option<&str>, top: usize) -> Self {
        let stats = &datasets.driver_stats;
        let mut drivers: Vec<StandingRow> = stats
            .iter()
            .filter(|stat| track.is_none_or(|track| stat.track == track))
            .map(|stat| StandingRow {
                driver: stat.vehicle_id.clone(),
                track: stat.track.clone(),
                best_lap_sec: stat.best_lap_time,
                rank: stat.rank,
                field_size: field_size(stats, Some(&stat.track)),
                percentile: stat.percentile,
                gap_to_leader: gap_to_leader(stats, &stat.vehicle_id, Some(&stat.track)),
                style: style_label(&datasets.clusters, &stat.vehicle_id).map(str::to_string),
            })
            .collect();
        drivers.sort_by(|a, b| a.track.cmp(&b.track).then(a.rank.cmp(&b.rank)));

        Self {
            track: track.map(str::to_string),
            summary: DatasetSummary::of(&datasets.corner_features),
            leader: fastest_driver(stats, track).cloned(),
            drivers,
            top_features: top_features(&datasets.feature_importance, top)
                .into_iter()
                .map(|importance| FeatureRanking {
                    feature: importance.feature.clone(),
                    display_name: importance.display_name(),
                    importance: importance.importance,
                })
                .collect(),
        }
    }
}

pub fn execute(args: &StandingsArgs, env: &CommandEnv) -> Result<()> {
    let datasets = load_datasets(&args.data.data)?;
    let report = StandingsReport::build(&datasets, args.track.as_deref(), args.top);
    if env.json {
        output::print_json("standings", &report)
    } else {
        output::print_standings(&report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apexcoach_telemetry_core::{ClusterLabel, FeatureImportance};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn stat(driver: &str, track: &str, best: f64, rank: u32) -> DriverStat {
        DriverStat {
            vehicle_id: driver.to_string(),
            track: track.to_string(),
            best_lap_time: best,
            rank,
            percentile: 50.0,
        }
    }

    #[test]
    fn rows_are_ordered_by_track_then_rank() -> TestResult {
        let datasets = Datasets {
            driver_stats: vec![
                stat("b", "VIR", 130.0, 2),
                stat("a", "VIR", 129.0, 1),
                stat("c", "Barber", 101.0, 1),
            ],
            clusters: vec![ClusterLabel {
                vehicle_id: "a".to_string(),
                style_label: "Late Braker".to_string(),
            }],
            ..Datasets::default()
        };
        let report = StandingsReport::build(&datasets, None, 4);
        let order: Vec<&str> = report.drivers.iter().map(|row| row.driver.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);

        let leader = report.leader.ok_or("no leader")?;
        assert_eq!(leader.vehicle_id, "c");

        let b = report.drivers.get(2).ok_or("missing b")?;
        let gap = b.gap_to_leader.ok_or("no gap")?;
        assert!((gap.seconds - 1.0).abs() < 1e-9);
        assert_eq!(b.field_size, 2);

        let a = report.drivers.get(1).ok_or("missing a")?;
        assert_eq!(a.style.as_deref(), Some("Late Braker"));
        Ok(())
    }

    #[test]
    fn track_filter_and_feature_ranking() -> TestResult {
        let datasets = Datasets {
            driver_stats: vec![stat("a", "VIR", 129.0, 1), stat("c", "Barber", 101.0, 1)],
            feature_importance: vec![
                FeatureImportance {
                    feature: "max_brake".to_string(),
                    importance: 0.2,
                },
                FeatureImportance {
                    feature: "corner_duration".to_string(),
                    importance: 0.5,
                },
            ],
            ..Datasets::default()
        };
        let report = StandingsReport::build(&datasets, Some("VIR"), 1);
        assert_eq!(report.drivers.len(), 1);
        let top = report.top_features.first().ok_or("no features")?;
        assert_eq!(top.display_name, "Corner Duration");
        assert_eq!(report.top_features.len(), 1);
        Ok(())
    }
}
