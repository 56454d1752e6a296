//! Corner-by-corner comparison against a benchmark driver.

use crate::commands::{
    CommandEnv, CompareArgs, ensure_known_driver, load_datasets, resolve_benchmark,
};
use crate::output;
use anyhow::Result;
use apexcoach_coaching::{
    ComparisonEngine, ComparisonQuery, ComparisonSource, CornerInsight, CornerRange,
    DEFAULT_TOP_OPPORTUNITIES, corner_insights, recoverable_time, top_opportunities,
};
use apexcoach_telemetry_core::{ComparisonRecord, DriverCornerFeature};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub driver: String,
    pub benchmark: String,
    pub track: Option<String>,
    pub range: CornerRange,
    pub source: ComparisonSource,
    pub recoverable_time_sec: f64,
    /// One entry per compared corner, by corner number.
    pub insights: Vec<CornerInsight>,
    pub top_opportunities: Vec<CornerInsight>,
}

impl CompareReport {
    pub fn build(
        comparisons: &[ComparisonRecord],
        features: &[DriverCornerFeature],
        query: ComparisonQuery,
    ) -> Self {
        let comparison = ComparisonEngine::new(comparisons, features).compare(&query);
        let top = top_opportunities(&comparison.records, DEFAULT_TOP_OPPORTUNITIES)
            .into_iter()
            .map(CornerInsight::from_record)
            .collect();
        Self {
            recoverable_time_sec: recoverable_time(&comparison.records),
            insights: corner_insights(&comparison.records),
            top_opportunities: top,
            source: comparison.source,
            driver: query.slow,
            benchmark: query.fast,
            track: query.track,
            range: query.range,
        }
    }
}

pub fn execute(args: &CompareArgs, env: &CommandEnv) -> Result<()> {
    let datasets = load_datasets(&args.data.data)?;
    let track = args.track.as_deref();
    ensure_known_driver(&datasets, &args.driver)?;
    let benchmark = resolve_benchmark(&datasets, args.benchmark.as_deref(), track)?;
    let range = args
        .range
        .resolve(&datasets.comparisons, &args.driver, &benchmark, track)?;

    let mut query = ComparisonQuery::new(args.driver.as_str(), benchmark, range);
    query.track = args.track.clone();
    let report = CompareReport::build(&datasets.comparisons, &datasets.corner_features, query);

    if env.json {
        output::print_json("comparison", &report)
    } else {
        output::print_compare(&report);
        Ok(())
    }
}
