//! Achievements
//!
//! Fixed catalogue of progress counters. An achievement unlocks once its
//! progress reaches the requirement and then stops counting.

use serde::{Serialize, Deserialize};

/// Achievement ids referenced by game-over bookkeeping.
pub mod ids {
    /// First executed match
    pub const FIRST_MATCH: &str = "first_match";
    /// Ten games played
    pub const TEN_GAMES: &str = "10_games";
    /// Score thresholds
    pub const SCORE_1000: &str = "score_1000";
    /// Score thresholds
    pub const SCORE_5000: &str = "score_5000";
    /// Score thresholds
    pub const SCORE_10000: &str = "score_10000";
    /// Combo of 5x
    pub const COMBO_5X: &str = "combo_5x";
    /// Lifetime nodes cleared
    pub const CLEAR_100: &str = "clear_100";
    /// Lifetime nodes cleared
    pub const CLEAR_1000: &str = "clear_1000";
    /// Every core unlocked
    pub const UNLOCK_ALL_CORES: &str = "unlock_all_cores";
    /// A core at max level
    pub const MAX_UPGRADE: &str = "max_upgrade";
    /// A star pattern
    pub const STAR_MATCH: &str = "star_match";
    /// Line patterns
    pub const LINE_MATCH: &str = "line_match";
    /// Daily challenge completed
    pub const DAILY_COMPLETE: &str = "daily_complete";
    /// Total play time in seconds
    pub const PLAY_HOUR: &str = "play_hour";
    /// Shards held
    pub const SHARDS_10000: &str = "shards_10000";
}

/// One catalogue entry plus its progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable id used in saves
    pub id: String,
    /// Display title
    pub title: String,
    /// Display description
    pub description: String,
    /// Progress needed to unlock
    pub requirement: u32,
    /// Current progress
    pub progress: u32,
    /// Unlocked (terminal)
    pub unlocked: bool,
    /// Shards awarded on unlock
    pub reward_shards: u32,
}

impl Achievement {
    /// New, locked achievement.
    pub fn new(id: &str, title: &str, description: &str, requirement: u32, reward_shards: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            requirement,
            progress: 0,
            unlocked: false,
            reward_shards,
        }
    }

    /// Add progress. Returns true only on the call that unlocks it;
    /// already unlocked achievements ignore the call.
    pub fn update_progress(&mut self, amount: u32) -> bool {
        if self.unlocked {
            return false;
        }
        self.progress = self.progress.saturating_add(amount);
        if self.progress >= self.requirement {
            self.unlocked = true;
            return true;
        }
        false
    }

    /// Progress towards the requirement in `[0, 1]`.
    pub fn progress_fraction(&self) -> f32 {
        if self.requirement == 0 {
            return 1.0;
        }
        (self.progress as f32 / self.requirement as f32).min(1.0)
    }

    /// The stock catalogue, all locked.
    pub fn defaults() -> Vec<Achievement> {
        use ids::*;
        vec![
            Achievement::new(FIRST_MATCH, "First Match", "Complete your first match", 1, 50),
            Achievement::new(TEN_GAMES, "Getting Started", "Play 10 games", 10, 100),
            Achievement::new(SCORE_1000, "Novice", "Score 1,000 points in a single game", 1000, 150),
            Achievement::new(SCORE_5000, "Expert", "Score 5,000 points in a single game", 5000, 300),
            Achievement::new(SCORE_10000, "Master", "Score 10,000 points in a single game", 10000, 500),
            Achievement::new(COMBO_5X, "Combo Master", "Reach a 5x combo", 5, 200),
            Achievement::new(CLEAR_100, "Destroyer", "Clear 100 nodes", 100, 100),
            Achievement::new(CLEAR_1000, "Annihilator", "Clear 1,000 nodes", 1000, 300),
            Achievement::new(UNLOCK_ALL_CORES, "Core Collector", "Unlock all Nexus Cores", 5, 500),
            Achievement::new(MAX_UPGRADE, "Fully Charged", "Upgrade a core to max level", 1, 400),
            Achievement::new(STAR_MATCH, "Star Power", "Complete a star pattern match", 1, 150),
            Achievement::new(LINE_MATCH, "Line Master", "Complete 10 line pattern matches", 10, 200),
            Achievement::new(DAILY_COMPLETE, "Daily Dedication", "Complete a daily challenge", 1, 150),
            Achievement::new(PLAY_HOUR, "Dedicated Player", "Play for 1 hour total", 3600, 300),
            Achievement::new(SHARDS_10000, "Shard Hoarder", "Collect 10,000 shards", 10000, 1000),
        ]
    }
}
