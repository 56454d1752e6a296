//! End-to-end pipeline tests: raw telemetry on disk through to coaching.
//!
//! - CSV telemetry → reshape → segment → extract
//! - Corner features → fallback comparison → diagnosis and advice
//! - Dataset snapshot written to disk and loaded back
//! - Configuration-driven segmentation and channel aliases

use apexcoach_coaching::{
    Benchmark, ComparisonEngine, ComparisonQuery, ComparisonSource, CornerIssue, CornerRange,
    LossSeverity, gap_to_leader, multi_driver_time_loss, project_what_if, recoverable_time,
    top_opportunities,
};
use apexcoach_datasets::{Datasets, load_sample_set, write_sample_set};
use apexcoach_integration_tests::{
    FAST_DRIVER, FIELD_TRACK, SLOW_DRIVER, UNDER_BRAKING_DRIVER, coach, field, field_datasets,
    field_samples, lap_features, sample_set_features,
};
use apexcoach_telemetry_config::{AnalysisConfig, load_default_config};
use apexcoach_telemetry_core::{ChannelCoverage, LogicalChannel, SampleSet, reshape_lap};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn default_config() -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    Ok(load_default_config()?)
}

#[test]
fn raw_csv_to_corner_features() -> TestResult {
    let config = default_config()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("vir_r1.csv");
    let laps = field();
    let samples: Vec<_> = laps.iter().flat_map(|lap| lap.samples()).collect();
    write_sample_set(&path, &samples)?;

    let loaded = load_sample_set(&path)?;
    assert_eq!(loaded.len(), samples.len());
    assert_eq!(loaded.laps().len(), 3);

    let features = sample_set_features(&loaded, FIELD_TRACK, &config);
    assert_eq!(features.len(), 12);
    for driver in [FAST_DRIVER, SLOW_DRIVER, UNDER_BRAKING_DRIVER] {
        let numbers: Vec<u32> = features
            .iter()
            .filter(|row| row.vehicle_id == driver)
            .map(|row| row.corner_num())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4], "corner numbering for {driver}");
    }
    Ok(())
}

#[test]
fn corner_windows_follow_throttle_dips() -> TestResult {
    let config = default_config()?;
    let laps = field();
    let samples = field_samples(&laps);
    let fast = laps.first().ok_or("empty field")?;

    let features = lap_features(&samples, FAST_DRIVER, 1, &config).ok_or("not telemetry")?;
    assert_eq!(features.len(), fast.dips().len());
    for (feature, dip) in features.iter().zip(fast.dips()) {
        assert_eq!(feature.start_idx, dip.start);
        assert_eq!(feature.end_idx, dip.end());
        assert_eq!(feature.apex_idx, dip.apex());
        assert_eq!(feature.corner_duration, dip.length);
        assert!((feature.apex_throttle - dip.min_throttle).abs() < 1e-9);
        assert!((feature.max_brake - dip.peak_brake).abs() < 1e-9);
        assert!(feature.apex_lateral_g.abs() > 1.0);
    }
    Ok(())
}

#[test]
fn slow_driver_is_coached_on_braking() -> TestResult {
    let config = default_config()?;
    let datasets = field_datasets(&field(), FIELD_TRACK, &config);
    let run = coach(&datasets, FIELD_TRACK, SLOW_DRIVER, FAST_DRIVER);

    assert_eq!(run.comparison.source, ComparisonSource::Synthesized);
    assert_eq!(run.insights.len(), 4);

    let t1 = run.insights.first().ok_or("no T1")?;
    assert_eq!(t1.issue, CornerIssue::OverBraking);
    assert_eq!(t1.advice, "Brake lighter, carry more speed");
    assert_eq!(t1.severity, LossSeverity::Moderate);
    assert!((t1.record.time_lost_sec - 0.24).abs() < 1e-9);

    assert!((recoverable_time(&run.comparison.records) - 0.36).abs() < 1e-9);
    let top = top_opportunities(&run.comparison.records, 3);
    let corners: Vec<u32> = top.iter().map(|record| record.corner).collect();
    assert_eq!(corners, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn under_braking_driver_gets_each_issue() -> TestResult {
    let config = default_config()?;
    let datasets = field_datasets(&field(), FIELD_TRACK, &config);
    let run = coach(&datasets, FIELD_TRACK, UNDER_BRAKING_DRIVER, FAST_DRIVER);

    let issues: Vec<CornerIssue> = run.insights.iter().map(|insight| insight.issue).collect();
    assert_eq!(
        issues,
        vec![
            CornerIssue::UnderBraking,
            CornerIssue::AggressiveThrottle,
            CornerIssue::InconsistentSpeed,
            CornerIssue::InconsistentSpeed,
        ]
    );
    let advice: Vec<&str> = run.insights.iter().map(|insight| insight.advice.as_str()).collect();
    assert_eq!(
        advice,
        vec![
            "Brake harder and later",
            "Smoother throttle application",
            "Focus on entry consistency",
            "Focus on entry consistency",
        ]
    );
    Ok(())
}

#[test]
fn swapping_drivers_negates_deltas() -> TestResult {
    let config = default_config()?;
    let datasets = field_datasets(&field(), FIELD_TRACK, &config);
    let forward = coach(&datasets, FIELD_TRACK, SLOW_DRIVER, FAST_DRIVER).comparison.records;
    let backward = coach(&datasets, FIELD_TRACK, FAST_DRIVER, SLOW_DRIVER).comparison.records;

    assert_eq!(forward.len(), backward.len());
    for (a, b) in forward.iter().zip(&backward) {
        assert_eq!(a.corner, b.corner);
        assert!((a.time_lost_sec + b.time_lost_sec).abs() < 1e-9);
        assert!((a.brake_delta + b.brake_delta).abs() < 1e-9);
        assert!((a.apex_throttle_delta + b.apex_throttle_delta).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn precomputed_table_survives_disk_round_trip() -> TestResult {
    let config = default_config()?;
    let mut datasets = field_datasets(&field(), FIELD_TRACK, &config);
    datasets.comparisons = coach(&datasets, FIELD_TRACK, SLOW_DRIVER, FAST_DRIVER)
        .comparison
        .records;

    let dir = tempfile::tempdir()?;
    datasets.write_dir(dir.path())?;
    let loaded = Datasets::load_dir(dir.path())?;
    assert_eq!(loaded.corner_features.len(), datasets.corner_features.len());
    assert_eq!(loaded.driver_stats, datasets.driver_stats);

    let run = coach(&loaded, FIELD_TRACK, SLOW_DRIVER, FAST_DRIVER);
    assert_eq!(run.comparison.source, ComparisonSource::Precomputed);
    assert_eq!(run.comparison.records.len(), 4);
    Ok(())
}

#[test]
fn benchmark_standings_and_projection() -> TestResult {
    let config = default_config()?;
    let datasets = field_datasets(&field(), FIELD_TRACK, &config);

    let benchmark = Benchmark::Fastest
        .resolve(&datasets.driver_stats, &datasets.corner_features, Some(FIELD_TRACK))
        .ok_or("no benchmark")?;
    assert_eq!(benchmark, FAST_DRIVER);

    let gap =
        gap_to_leader(&datasets.driver_stats, SLOW_DRIVER, Some(FIELD_TRACK)).ok_or("no gap")?;
    assert!((gap.seconds - 1.6).abs() < 1e-9);

    let projection = project_what_if(10.0, 25.6);
    assert!((projection.projected_lap_sec - 24.4).abs() < 1e-9);

    let engine = ComparisonEngine::new(&datasets.comparisons, &datasets.corner_features);
    let drivers = vec![
        FAST_DRIVER.to_string(),
        SLOW_DRIVER.to_string(),
        UNDER_BRAKING_DRIVER.to_string(),
    ];
    let losses = multi_driver_time_loss(
        &engine,
        &drivers,
        &benchmark,
        Some(FIELD_TRACK),
        CornerRange::default(),
    );
    let names: Vec<&str> = losses.iter().map(|loss| loss.driver.as_str()).collect();
    assert_eq!(names, vec![SLOW_DRIVER, UNDER_BRAKING_DRIVER]);
    assert!(losses.iter().all(|loss| loss.records.len() == 4));
    Ok(())
}

#[test]
fn corner_range_limits_comparison() -> TestResult {
    let config = default_config()?;
    let datasets = field_datasets(&field(), FIELD_TRACK, &config);
    let engine = ComparisonEngine::new(&datasets.comparisons, &datasets.corner_features);

    let query = ComparisonQuery::new(SLOW_DRIVER, FAST_DRIVER, CornerRange::new(2, 3))
        .on_track(FIELD_TRACK);
    let corners: Vec<u32> = engine.compare(&query).records.iter().map(|r| r.corner).collect();
    assert_eq!(corners, vec![2, 3]);

    let query =
        ComparisonQuery::new(SLOW_DRIVER, FAST_DRIVER, CornerRange::default()).on_track("Sebring");
    assert!(engine.compare(&query).is_empty());
    Ok(())
}

#[test]
fn longer_minimum_length_drops_short_corners() -> TestResult {
    let mut config = default_config()?;
    config.segmentation.min_corner_length = 13;
    let laps = field();
    let samples = field_samples(&laps);

    let features = lap_features(&samples, FAST_DRIVER, 1, &config).ok_or("not telemetry")?;
    let starts: Vec<usize> = features.iter().map(|f| f.start_idx).collect();
    assert_eq!(starts, vec![50, 180, 300]);
    let numbers: Vec<u32> = features.iter().map(|f| f.corner_num).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn throttle_alias_is_resolved_by_priority() -> TestResult {
    let config = default_config()?;
    let laps = field();
    let fast = laps.first().ok_or("empty field")?;
    let renamed: Vec<_> = fast
        .samples()
        .into_iter()
        .map(|mut sample| {
            if sample.channel == "ath" {
                sample.channel = "TPS".to_string();
            }
            sample
        })
        .collect();
    let samples = SampleSet::long_format(renamed);

    let features = lap_features(&samples, FAST_DRIVER, 1, &config).ok_or("not telemetry")?;
    assert_eq!(features.len(), 4);

    let lap = reshape_lap(&samples, FAST_DRIVER, 1).ok_or("not telemetry")?;
    let coverage = ChannelCoverage::detect(&lap, &config.channels);
    assert_eq!(coverage.get(LogicalChannel::Throttle), Some("TPS"));
    assert_eq!(coverage.missing(), vec![LogicalChannel::RearBrake]);
    Ok(())
}

#[test]
fn unresolved_throttle_yields_no_corners() -> TestResult {
    let mut config = default_config()?;
    config.channels.throttle = vec!["pedal_position".to_string()];
    let laps = field();
    let samples = field_samples(&laps);

    let features = lap_features(&samples, SLOW_DRIVER, 1, &config).ok_or("not telemetry")?;
    assert!(features.is_empty());
    Ok(())
}

#[test]
fn track_profile_flags_implausible_corner_counts() -> TestResult {
    let config = default_config()?;
    let laps = field();
    let samples = field_samples(&laps);
    let features = lap_features(&samples, SLOW_DRIVER, 1, &config).ok_or("not telemetry")?;

    let vir = config.track(FIELD_TRACK).ok_or("no VIR profile")?;
    assert!(!vir.corner_count_plausible(features.len()));
    assert!(vir.corner_count_plausible(12));
    Ok(())
}
