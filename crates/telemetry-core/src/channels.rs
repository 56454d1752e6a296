//! Logical channels and alias-based channel resolution.
//!
//! Logging systems name the same signal differently (`ath`, `TPS`, `throttle`,
//! ...). A logical channel is resolved by scanning an ordered alias list and
//! taking the first alias the dataset actually carries. Each logical channel
//! is resolved on its own so a dataset missing one channel still yields the
//! features that depend on the others.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// Anything that can answer "does this field exist".
pub trait FieldSchema {
    fn has_field(&self, name: &str) -> bool;
}

impl FieldSchema for BTreeSet<String> {
    fn has_field(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl FieldSchema for HashSet<String> {
    fn has_field(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl FieldSchema for [&str] {
    fn has_field(&self, name: &str) -> bool {
        self.iter().any(|field| *field == name)
    }
}

impl FieldSchema for [String] {
    fn has_field(&self, name: &str) -> bool {
        self.iter().any(|field| field == name)
    }
}

impl<T: FieldSchema + ?Sized> FieldSchema for &T {
    fn has_field(&self, name: &str) -> bool {
        (**self).has_field(name)
    }
}

/// Return the first alias present in `schema`, in the order supplied.
pub fn resolve_channel<'a, S, A>(schema: &S, aliases: &'a [A]) -> Option<&'a str>
where
    S: FieldSchema + ?Sized,
    A: AsRef<str>,
{
    for alias in aliases {
        let alias: &str = alias.as_ref();
        if schema.has_field(alias) {
            return Some(alias);
        }
    }
    None
}

/// Signals the analysis understands, independent of dataset naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalChannel {
    Throttle,
    FrontBrake,
    RearBrake,
    LateralAccel,
    SteeringAngle,
}

impl LogicalChannel {
    pub const ALL: [LogicalChannel; 5] = [
        LogicalChannel::Throttle,
        LogicalChannel::FrontBrake,
        LogicalChannel::RearBrake,
        LogicalChannel::LateralAccel,
        LogicalChannel::SteeringAngle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogicalChannel::Throttle => "throttle",
            LogicalChannel::FrontBrake => "front_brake",
            LogicalChannel::RearBrake => "rear_brake",
            LogicalChannel::LateralAccel => "lateral_accel",
            LogicalChannel::SteeringAngle => "steering_angle",
        }
    }

    /// Built-in alias list, most likely name first.
    pub fn default_aliases(self) -> &'static [&'static str] {
        match self {
            LogicalChannel::Throttle => &[
                "ath", "ATH", "throttle", "Throttle", "TPS", "tps", "aps", "APS",
            ],
            LogicalChannel::FrontBrake => &["pbrake_f", "brake_f", "Brake_F", "brake_front"],
            LogicalChannel::RearBrake => &["pbrake_r", "brake_r", "Brake_R", "brake_rear"],
            LogicalChannel::LateralAccel => &["accy_can", "accy", "lateral_accel", "AccY"],
            LogicalChannel::SteeringAngle => &["Steering_Angle", "steering", "Steering", "steer"],
        }
    }
}

impl fmt::Display for LogicalChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn owned(aliases: &[&str]) -> Vec<String> {
    aliases.iter().map(|alias| (*alias).to_string()).collect()
}

/// Alias priority lists for every logical channel. Lists left out of a
/// serialized form keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelAliases {
    pub throttle: Vec<String>,
    pub front_brake: Vec<String>,
    pub rear_brake: Vec<String>,
    pub lateral_accel: Vec<String>,
    pub steering_angle: Vec<String>,
}

impl Default for ChannelAliases {
    fn default() -> Self {
        Self {
            throttle: owned(LogicalChannel::Throttle.default_aliases()),
            front_brake: owned(LogicalChannel::FrontBrake.default_aliases()),
            rear_brake: owned(LogicalChannel::RearBrake.default_aliases()),
            lateral_accel: owned(LogicalChannel::LateralAccel.default_aliases()),
            steering_angle: owned(LogicalChannel::SteeringAngle.default_aliases()),
        }
    }
}

impl ChannelAliases {
    pub fn aliases(&self, channel: LogicalChannel) -> &[String] {
        match channel {
            LogicalChannel::Throttle => &self.throttle,
            LogicalChannel::FrontBrake => &self.front_brake,
            LogicalChannel::RearBrake => &self.rear_brake,
            LogicalChannel::LateralAccel => &self.lateral_accel,
            LogicalChannel::SteeringAngle => &self.steering_angle,
        }
    }

    /// Resolve one logical channel against a schema.
    pub fn resolve<'a, S>(&'a self, schema: &S, channel: LogicalChannel) -> Option<&'a str>
    where
        S: FieldSchema + ?Sized,
    {
        let resolved = resolve_channel(schema, self.aliases(channel));
        if resolved.is_none() {
            tracing::debug!(channel = %channel, "no alias resolved");
        }
        resolved
    }
}

/// Which alias, if any, each logical channel resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCoverage {
    pub resolved: BTreeMap<LogicalChannel, Option<String>>,
}

impl ChannelCoverage {
    pub fn detect<S>(schema: &S, aliases: &ChannelAliases) -> Self
    where
        S: FieldSchema + ?Sized,
    {
        let resolved = LogicalChannel::ALL
            .iter()
            .map(|&channel| (channel, aliases.resolve(schema, channel).map(str::to_string)))
            .collect();
        Self { resolved }
    }

    pub fn get(&self, channel: LogicalChannel) -> Option<&str> {
        self.resolved.get(&channel).and_then(|alias| alias.as_deref())
    }

    pub fn missing(&self) -> Vec<LogicalChannel> {
        self.resolved
            .iter()
            .filter_map(|(channel, alias)| alias.is_none().then_some(*channel))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(fields: &[&str]) -> BTreeSet<String> {
        fields.iter().map(|f| (*f).to_string()).collect()
    }

    #[test]
    fn resolve_returns_first_alias_in_priority_order() {
        let fields = schema(&["TPS", "throttle", "ath"]);
        let resolved = resolve_channel(&fields, LogicalChannel::Throttle.default_aliases());
        assert_eq!(resolved, Some("ath"));
    }

    #[test]
    fn resolve_follows_caller_order_not_schema_order() {
        let fields = schema(&["accy", "accy_can"]);
        assert_eq!(resolve_channel(&fields, &["accy", "accy_can"]), Some("accy"));
        assert_eq!(resolve_channel(&fields, &["accy_can", "accy"]), Some("accy_can"));
    }

    #[test]
    fn resolve_reports_missing_channel_as_none() {
        let fields = schema(&["speed", "gear"]);
        assert_eq!(
            resolve_channel(&fields, LogicalChannel::SteeringAngle.default_aliases()),
            None
        );
    }

    #[test]
    fn resolve_is_case_sensitive() {
        let fields = schema(&["Brake_f"]);
        assert_eq!(
            resolve_channel(&fields, LogicalChannel::FrontBrake.default_aliases()),
            None
        );
    }

    #[test]
    fn resolve_works_over_slices() {
        let fields: [&str; 2] = ["gear", "steer"];
        assert_eq!(
            resolve_channel(&fields[..], LogicalChannel::SteeringAngle.default_aliases()),
            Some("steer")
        );
    }

    #[test]
    fn coverage_lists_missing_channels() {
        let fields = schema(&["ath", "pbrake_f", "accy_can"]);
        let coverage = ChannelCoverage::detect(&fields, &ChannelAliases::default());
        assert_eq!(coverage.get(LogicalChannel::Throttle), Some("ath"));
        assert_eq!(
            coverage.missing(),
            vec![LogicalChannel::RearBrake, LogicalChannel::SteeringAngle]
        );
        assert!(!coverage.is_complete());
    }

    #[test]
    fn custom_aliases_override_defaults() {
        let aliases = ChannelAliases {
            throttle: vec!["pedal_pos".to_string()],
            ..ChannelAliases::default()
        };
        let fields = schema(&["pedal_pos", "ath"]);
        assert_eq!(
            aliases.resolve(&fields, LogicalChannel::Throttle),
            Some("pedal_pos")
        );
    }
}
