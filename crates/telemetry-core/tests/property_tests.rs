//! Property tests for channel resolution and lap reshaping.

use apexcoach_telemetry_core::{
    SampleSet, TelemetrySample, Timestamp, reshape_lap, resolve_channel,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn alias_pool() -> Vec<String> {
    ["ath", "ATH", "throttle", "TPS", "aps", "pedal"]
        .iter()
        .map(|a| (*a).to_string())
        .collect()
}

proptest! {
    #[test]
    fn resolver_returns_first_present_alias(mask in proptest::collection::vec(any::<bool>(), 6)) {
        let aliases = alias_pool();
        let schema: BTreeSet<String> = aliases
            .iter()
            .zip(mask.iter())
            .filter_map(|(alias, present)| present.then(|| alias.clone()))
            .collect();

        let expected = aliases.iter().find(|alias| schema.contains(*alias)).map(String::as_str);
        prop_assert_eq!(resolve_channel(&schema, &aliases), expected);
    }

    #[test]
    fn reshape_rows_match_distinct_timestamps(
        readings in proptest::collection::vec((0i64..50, 0usize..3, -10.0f64..110.0), 0..200)
    ) {
        let channels = ["ath", "pbrake_f", "accy_can"];
        let samples: Vec<TelemetrySample> = readings
            .iter()
            .filter_map(|(tick, channel, value)| {
                channels.get(*channel).map(|name| {
                    TelemetrySample::new(Timestamp::from_millis(tick * 40), "car", 7, *name, *value)
                })
            })
            .collect();
        let distinct: BTreeSet<i64> = readings.iter().map(|(tick, _, _)| *tick).collect();

        let lap = reshape_lap(&SampleSet::long_format(samples), "car", 7);
        prop_assert!(lap.is_some());
        if let Some(lap) = lap {
            prop_assert_eq!(lap.len(), distinct.len());
            prop_assert!(lap
                .records()
                .windows(2)
                .all(|pair| matches!(pair, [a, b] if a.timestamp < b.timestamp)));
        }
    }

    #[test]
    fn reshape_is_idempotent(
        readings in proptest::collection::vec((0i64..20, -5.0f64..5.0), 0..60)
    ) {
        let samples: Vec<TelemetrySample> = readings
            .iter()
            .map(|(tick, value)| {
                let timestamp = Timestamp::from_millis(tick * 40);
                TelemetrySample::new(timestamp, "car", 1, "accy_can", *value)
            })
            .collect();
        let set = SampleSet::long_format(samples);
        prop_assert_eq!(reshape_lap(&set, "car", 1), reshape_lap(&set, "car", 1));
    }
}
