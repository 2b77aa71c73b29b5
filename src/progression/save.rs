//! Save Data
//!
//! JSON wire shape for a [`Profile`]. Writing can fail only on encoding;
//! loading never fails. Every malformed or missing field falls back to its
//! default on its own, so one bad entry never costs the rest of the save.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::game::color::NodeColor;
use crate::progression::profile::{Profile, Statistics};

/// Save errors.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// JSON encoding failed.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted core state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoreRecord {
    /// Core colour
    pub color: NodeColor,
    /// 1..=3
    pub level: u8,
    /// Purchased
    pub unlocked: bool,
}

/// Persisted achievement progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AchievementRecord {
    /// Catalogue id
    pub id: String,
    /// Unlocked
    pub unlocked: bool,
    /// Progress counter
    pub progress: u32,
}

/// The persisted document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Currency
    pub shards: u32,
    /// Best score
    pub high_score: u32,
    /// Rounds finished
    pub games_played: u32,
    /// Last completed daily
    pub last_daily: Option<NaiveDate>,
    /// Per-core state
    pub cores: Vec<CoreRecord>,
    /// Per-achievement state
    pub achievements: Vec<AchievementRecord>,
    /// Lifetime statistics
    pub statistics: Statistics,
}

impl Default for SaveData {
    fn default() -> Self {
        Self::from_profile(&Profile::default())
    }
}

impl SaveData {
    /// Snapshot a profile.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            shards: profile.shards,
            high_score: profile.high_score,
            games_played: profile.games_played,
            last_daily: profile.last_daily,
            cores: profile
                .cores
                .cores()
                .iter()
                .map(|c| CoreRecord { color: c.color, level: c.level, unlocked: c.unlocked })
                .collect(),
            achievements: profile
                .achievements
                .iter()
                .map(|a| AchievementRecord { id: a.id.clone(), unlocked: a.unlocked, progress: a.progress })
                .collect(),
            statistics: profile.statistics.clone(),
        }
    }

    /// Rebuild a profile on top of the defaults.
    ///
    /// Records for unknown colours or ids are ignored; cores and
    /// achievements without a record keep their defaults.
    pub fn into_profile(self) -> Profile {
        let mut profile = Profile {
            shards: self.shards,
            high_score: self.high_score,
            games_played: self.games_played,
            last_daily: self.last_daily,
            statistics: self.statistics,
            ..Profile::default()
        };

        for record in self.cores {
            if let Some(core) = profile.cores.get_mut(record.color) {
                core.set_level(record.level);
                core.unlocked = record.unlocked;
            }
        }

        for record in self.achievements {
            if let Some(achievement) = profile.achievements.iter_mut().find(|a| a.id == record.id) {
                achievement.unlocked = record.unlocked;
                achievement.progress = record.progress;
            }
        }

        profile
    }

    /// Encode as pretty JSON.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode leniently.
    ///
    /// An unparsable document yields the default save; otherwise each
    /// field and list entry is decoded independently.
    pub fn from_json(json: &str) -> SaveData {
        let defaults = SaveData::default();

        let root = match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("save document is not an object, using defaults");
                return defaults;
            }
            Err(e) => {
                warn!(error = %e, "unparsable save document, using defaults");
                return defaults;
            }
        };

        SaveData {
            shards: field(&root, "shards", defaults.shards),
            high_score: field(&root, "high_score", defaults.high_score),
            games_played: field(&root, "games_played", defaults.games_played),
            last_daily: field(&root, "last_daily", defaults.last_daily),
            cores: entries(&root, "cores"),
            achievements: entries(&root, "achievements"),
            statistics: statistics(&root),
        }
    }
}

/// Decode `key`, or `default` if it is missing or malformed.
fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, default: T) -> T {
    let Some(value) = map.get(key) else {
        return default;
    };
    match serde_json::from_value(value.clone()) {
        Ok(v) => v,
        Err(e) => {
            warn!(key, error = %e, "malformed save field, using default");
            default
        }
    }
}

/// Decode every well-formed entry of the list at `key`, skipping the rest.
fn entries<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Vec<T> {
    let Some(value) = map.get(key) else {
        return Vec::new();
    };
    let Value::Array(items) = value else {
        warn!(key, "save field is not a list, using defaults");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key, error = %e, "skipping malformed save entry");
                None
            }
        })
        .collect()
}

fn statistics(root: &Map<String, Value>) -> Statistics {
    let defaults = Statistics::default();
    let Some(value) = root.get("statistics") else {
        return defaults;
    };
    let Value::Object(map) = value else {
        warn!("statistics is not an object, using defaults");
        return defaults;
    };
    Statistics {
        total_matches: field(map, "total_matches", defaults.total_matches),
        total_nodes_cleared: field(map, "total_nodes_cleared", defaults.total_nodes_cleared),
        highest_combo: field(map, "highest_combo", defaults.highest_combo),
        total_play_time_secs: field(map, "total_play_time_secs", defaults.total_play_time_secs),
    }
}
