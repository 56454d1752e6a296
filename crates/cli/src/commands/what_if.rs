//! Lap time projection from a driver's best lap.

use crate::commands::{CommandEnv, WhatIfArgs, ensure_known_driver, load_datasets};
use crate::error::CliError;
use crate::output;
use anyhow::Result;
use apexcoach_coaching::{
    LeaderGap, MAX_IMPROVEMENT_PCT, MIN_IMPROVEMENT_PCT, WhatIfProjection, driver_stat,
    gap_to_leader, project_what_if,
};
use apexcoach_errors::ValidationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WhatIfReport {
    pub driver: String,
    /// Track of the best lap the projection starts from.
    pub track: String,
    pub projection: WhatIfProjection,
    pub gap_to_leader: Option<LeaderGap>,
}

/// Reject improvements outside the supported range before projecting.
pub fn validate_improvement(improvement_pct: f64) -> Result<f64, CliError> {
    if (MIN_IMPROVEMENT_PCT..=MAX_IMPROVEMENT_PCT).contains(&improvement_pct) {
        Ok(improvement_pct)
    } else {
        Err(ValidationError::out_of_range(
            "--improvement",
            improvement_pct,
            MIN_IMPROVEMENT_PCT,
            MAX_IMPROVEMENT_PCT,
        )
        .into())
    }
}

pub fn execute(args: &WhatIfArgs, env: &CommandEnv) -> Result<()> {
    let improvement = validate_improvement(args.improvement)?;
    let datasets = load_datasets(&args.data.data)?;
    ensure_known_driver(&datasets, &args.driver)?;

    let track = args.track.as_deref();
    let stat = driver_stat(&datasets.driver_stats, &args.driver, track)
        .ok_or_else(|| CliError::DriverNotFound(format!("{} has no best lap", args.driver)))?;
    let report = WhatIfReport {
        driver: args.driver.clone(),
        track: stat.track.clone(),
        projection: project_what_if(improvement, stat.best_lap_time),
        gap_to_leader: gap_to_leader(&datasets.driver_stats, &args.driver, Some(&stat.track)),
    };

    if env.json {
        output::print_json("what_if", &report)
    } else {
        output::print_what_if(&report);
        Ok(())
    }
}
