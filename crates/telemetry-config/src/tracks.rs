//! Per-track profiles.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a track's race data lives and what a sane lap there looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackProfile {
    /// Path of the track's data, relative to the dataset root.
    pub data_path: PathBuf,
    pub races: Vec<String>,
    /// Whether each race has its own subdirectory under `data_path`.
    #[serde(default)]
    pub has_race_dirs: bool,
    /// Plausible number of detected corners per lap, inclusive.
    pub expected_corners: (u32, u32),
    /// Plausible lap time in seconds, inclusive.
    pub typical_lap_time: (f64, f64),
}

impl TrackProfile {
    pub fn corner_count_plausible(&self, corners: usize) -> bool {
        let (min, max) = self.expected_corners;
        u32::try_from(corners).is_ok_and(|count| (min..=max).contains(&count))
    }

    pub fn lap_time_plausible(&self, seconds: f64) -> bool {
        let (min, max) = self.typical_lap_time;
        (min..=max).contains(&seconds)
    }

    /// Directory holding each race's files, in race order.
    ///
    /// Tracks without per-race directories keep all races in `data_path`,
    /// so every race maps to the same directory.
    pub fn race_dirs(&self, root: &Path) -> Vec<(String, PathBuf)> {
        let base = root.join(&self.data_path);
        self.races
            .iter()
            .map(|race| {
                let dir = if self.has_race_dirs {
                    base.join(race)
                } else {
                    base.clone()
                };
                (race.clone(), dir)
            })
            .collect()
    }
}
