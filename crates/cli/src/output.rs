//! Output formatting for CLI responses

use crate::commands::compare::CompareReport;
use crate::commands::corners::CornersReport;
use crate::commands::demo::DemoReport;
use crate::commands::multi::MultiReport;
use crate::commands::standings::StandingsReport;
use crate::commands::what_if::WhatIfReport;
use crate::error::{CliError, error_type_name};
use anyhow::Error;
use apexcoach_coaching::{ComparisonSource, CornerInsight, LossSeverity};
use colored::*;
use serde::Serialize;
use serde_json::{Value, json};

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

/// Print a successful result as `{"success": true, "<key>": report}`.
pub fn print_json<T: Serialize>(key: &str, report: &T) -> anyhow::Result<()> {
    let mut output = serde_json::Map::new();
    output.insert("success".to_string(), Value::Bool(true));
    output.insert(key.to_string(), serde_json::to_value(report).map_err(CliError::from)?);
    let text = serde_json::to_string_pretty(&Value::Object(output)).map_err(CliError::from)?;
    println!("{text}");
    Ok(())
}

fn severity_marker(severity: LossSeverity) -> ColoredString {
    match severity {
        LossSeverity::Major => "●".red(),
        LossSeverity::Moderate => "●".yellow(),
        LossSeverity::Gaining => "●".green(),
    }
}

fn signed(value: f64) -> String {
    format!("{value:+.3}")
}

pub fn print_corners(report: &CornersReport) {
    println!(
        "{} {} lap {}: {} corners in {} samples",
        "Lap:".bold(),
        report.vehicle_id,
        report.lap,
        report.corners.len(),
        report.samples
    );
    println!(
        "  Segmentation: throttle < {:.1}, at least {} samples",
        report.segmentation.throttle_threshold, report.segmentation.min_corner_length
    );
    let missing = report.coverage.missing();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|channel| channel.as_str()).collect();
        println!("  {} {}", "Missing channels:".yellow(), names.join(", "));
    }
    if let (Some(track), Some(plausible)) = (&report.track, report.plausible) {
        let verdict = if plausible {
            "within expected range".green()
        } else {
            "outside expected range".red()
        };
        println!("  Corner count for {track}: {verdict}");
    }

    if report.corners.is_empty() {
        println!("{}", "No corners detected".yellow());
        return;
    }
    println!(
        "  {:<5} {:>11} {:>6} {:>6} {:>7} {:>7} {:>7} {:>7} {:>7}",
        "Turn", "Samples", "Apex", "Len", "Entry", "Apex%", "Exit", "Brake", "Lat g"
    );
    for corner in &report.corners {
        println!(
            "  {:<5} {:>11} {:>6} {:>6} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>7.2}",
            format!("T{}", corner.corner_num),
            format!("{}-{}", corner.start_idx, corner.end_idx),
            corner.apex_idx,
            corner.corner_duration,
            corner.entry_throttle,
            corner.apex_throttle,
            corner.exit_throttle,
            corner.max_brake,
            corner.apex_lateral_g
        );
    }
}

fn print_insight(insight: &CornerInsight) {
    let record = &insight.record;
    println!(
        "  {} {} {:>7}s  {:<22} {}",
        severity_marker(insight.severity),
        format!("T{:<3}", record.corner).bold(),
        signed(record.time_lost_sec),
        insight.issue.label(),
        insight.advice.dimmed()
    );
}

pub fn print_compare(report: &CompareReport) {
    println!(
        "{} {} vs {} ({}{})",
        "Comparison:".bold(),
        report.driver,
        report.benchmark,
        report.range,
        report.track.as_deref().map(|t| format!(", {t}")).unwrap_or_default()
    );
    match report.source {
        ComparisonSource::SelfComparison => {
            println!("{}", "Driver is the benchmark, nothing to compare".yellow());
            return;
        }
        ComparisonSource::Synthesized => {
            println!("  {}", "No precomputed comparison, derived from corner features".dimmed());
        }
        ComparisonSource::Precomputed => {}
    }
    if report.insights.is_empty() {
        println!("{}", "No shared corners in range".yellow());
        return;
    }

    for insight in &report.insights {
        print_insight(insight);
    }
    println!(
        "  {} {}s",
        "Recoverable time:".bold(),
        signed(report.recoverable_time_sec)
    );
    println!("{}", "Top opportunities:".bold());
    for insight in &report.top_opportunities {
        println!(
            "  T{}: {}s (~{:.0} m) {}",
            insight.record.corner,
            signed(insight.record.time_lost_sec),
            insight.distance_m,
            insight.advice
        );
    }
}

pub fn print_what_if(report: &WhatIfReport) {
    let projection = &report.projection;
    println!("{} {} at {}", "What-if:".bold(), report.driver, report.track);
    println!("  Current best:  {:.3}s", projection.current_best_sec);
    println!(
        "  Improvement:   {:.1}% ({}s)",
        projection.improvement_pct,
        signed(-projection.gain_sec)
    );
    println!(
        "  Projected lap: {}",
        format!("{:.3}s", projection.projected_lap_sec).green().bold()
    );
    if let Some(gap) = report.gap_to_leader {
        println!("  Gap to leader: {}s ({:.2}%)", signed(gap.seconds), gap.percent);
    }
}

pub fn print_standings(report: &StandingsReport) {
    let summary = &report.summary;
    println!(
        "{} {} corners, {} drivers, {} tracks",
        "Dataset:".bold(),
        summary.corner_count,
        summary.driver_count,
        summary.track_count
    );
    if let Some(leader) = &report.leader {
        println!(
            "{} {} {:.3}s at {}",
            "Leader:".bold(),
            leader.vehicle_id.green(),
            leader.best_lap_time,
            leader.track
        );
    }

    if report.drivers.is_empty() {
        println!("{}", "No driver stats".yellow());
    } else {
        println!("{}", "Standings:".bold());
        for row in &report.drivers {
            let gap = row
                .gap_to_leader
                .map(|gap| format!("{}s", signed(gap.seconds)))
                .unwrap_or_default();
            println!(
                "  P{:<3} {:<16} {:<14} {:>9.3}s {:>10} {}",
                row.rank,
                row.driver,
                row.track,
                row.best_lap_sec,
                gap,
                row.style.as_deref().unwrap_or("").dimmed()
            );
        }
    }

    if !report.top_features.is_empty() {
        println!("{}", "Top features:".bold());
        for feature in &report.top_features {
            println!("  {:<28} {:>5.1}%", feature.display_name, feature.importance * 100.0);
        }
    }
}

pub fn print_multi(report: &MultiReport) {
    println!(
        "{} benchmark {} ({}{})",
        "Time loss:".bold(),
        report.benchmark,
        report.range,
        report.track.as_deref().map(|t| format!(", {t}")).unwrap_or_default()
    );
    if report.drivers.is_empty() {
        println!("{}", "No drivers to compare".yellow());
        return;
    }
    for driver in &report.drivers {
        println!(
            "  {:<16} {:>8}s over {} corners",
            driver.driver.bold(),
            signed(driver.total_time_lost_sec),
            driver.records.len()
        );
        for record in &driver.records {
            println!("    T{:<3} {:>8}s", record.corner, signed(record.time_lost_sec));
        }
    }
}

pub fn print_demo(report: &DemoReport) {
    println!("{} {}", "Demo:".bold(), report.track);
    for lap in &report.laps {
        println!(
            "  {} lap {}: {:.2}s, {} samples, {} corners",
            lap.vehicle_id, lap.lap, lap.lap_time_sec, lap.samples, lap.corners.len()
        );
    }
    println!();
    print_compare(&report.comparison);
    println!();
    println!(
        "{} {:.1}% better gives {:.3}s (from {:.3}s)",
        "What-if:".bold(),
        report.what_if.improvement_pct,
        report.what_if.projected_lap_sec,
        report.what_if.current_best_sec
    );
}
