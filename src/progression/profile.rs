//! Player Profile
//!
//! Everything that survives between rounds: shards, high score, lifetime
//! statistics, cores and achievements. Game-over bookkeeping, core
//! purchases and the daily challenge all go through here.

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::game::color::NodeColor;
use crate::game::state::RoundSummary;
use crate::progression::achievement::{ids, Achievement};
use crate::progression::core::{NexusCore, MAX_CORE_LEVEL};
use crate::progression::cores::CoreManager;

/// Score points per shard earned.
pub const SCORE_PER_SHARD: u32 = 10;

/// Shards for completing the daily challenge.
pub const DAILY_REWARD_SHARDS: u32 = 500;

/// Combo that counts for the combo achievement.
const COMBO_ACHIEVEMENT_THRESHOLD: f32 = 5.0;

/// Single-game score achievements and their thresholds.
const SCORE_ACHIEVEMENTS: [(&str, u32); 3] = [
    (ids::SCORE_1000, 1000),
    (ids::SCORE_5000, 5000),
    (ids::SCORE_10000, 10000),
];

/// Purchase errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    /// No core for this colour.
    #[error("No core for {0:?}")]
    UnknownCore(NodeColor),

    /// Core is already unlocked.
    #[error("Core already unlocked")]
    AlreadyUnlocked,

    /// Core must be unlocked before upgrading.
    #[error("Core is locked")]
    CoreLocked,

    /// Core is at max level.
    #[error("Core is at max level")]
    MaxLevel,

    /// Not enough shards.
    #[error("Not enough shards: need {needed}, have {available}")]
    InsufficientShards {
        /// Price
        needed: u32,
        /// Balance
        available: u32,
    },
}

/// Lifetime statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// Matches executed
    pub total_matches: u32,
    /// Nodes cleared
    pub total_nodes_cleared: u32,
    /// Best combo ever reached
    pub highest_combo: f32,
    /// Game time played
    pub total_play_time_secs: u64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            total_matches: 0,
            total_nodes_cleared: 0,
            highest_combo: 1.0,
            total_play_time_secs: 0,
        }
    }
}

/// What a finished round earned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameRewards {
    /// Shards from score
    pub shards_earned: u32,
    /// Shards from achievements unlocked by this round
    pub achievement_shards: u32,
    /// Beat the previous high score
    pub new_high_score: bool,
    /// Ids of achievements unlocked by this round
    pub unlocked: Vec<String>,
}

/// Persistent player state.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    /// Currency
    pub shards: u32,
    /// Best single-round score
    pub high_score: u32,
    /// Rounds finished
    pub games_played: u32,
    /// Date of the last completed daily challenge
    pub last_daily: Option<NaiveDate>,
    /// The five cores
    pub cores: CoreManager,
    /// Achievement catalogue with progress
    pub achievements: Vec<Achievement>,
    /// Lifetime statistics
    pub statistics: Statistics,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            shards: 0,
            high_score: 0,
            games_played: 0,
            last_daily: None,
            cores: CoreManager::new(),
            achievements: Achievement::defaults(),
            statistics: Statistics::default(),
        }
    }
}

impl Profile {
    /// Fresh profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Achievement by id.
    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Apply end-of-round bookkeeping.
    pub fn record_game(&mut self, summary: &RoundSummary) -> GameRewards {
        let mut rewards = GameRewards::default();
        let score = summary.final_score;

        if score > self.high_score {
            self.high_score = score;
            rewards.new_high_score = true;
        }

        rewards.shards_earned = score / SCORE_PER_SHARD;
        self.shards = self.shards.saturating_add(rewards.shards_earned);
        self.games_played = self.games_played.saturating_add(1);

        let stats = &mut self.statistics;
        stats.total_matches = stats.total_matches.saturating_add(summary.matches);
        stats.total_nodes_cleared = stats.total_nodes_cleared.saturating_add(summary.nodes_cleared);
        stats.highest_combo = stats.highest_combo.max(summary.highest_combo);
        stats.total_play_time_secs = stats.total_play_time_secs.saturating_add(summary.play_time_secs);

        let mut unlocked = Vec::new();
        if summary.matches > 0 {
            self.bump(ids::FIRST_MATCH, 1, &mut unlocked);
        }
        self.bump(ids::TEN_GAMES, 1, &mut unlocked);
        for (id, threshold) in SCORE_ACHIEVEMENTS {
            if score >= threshold {
                self.bump(id, score, &mut unlocked);
            }
        }
        if summary.highest_combo >= COMBO_ACHIEVEMENT_THRESHOLD {
            self.raise(ids::COMBO_5X, COMBO_ACHIEVEMENT_THRESHOLD as u32, &mut unlocked);
        }
        let cleared = self.statistics.total_nodes_cleared;
        self.raise(ids::CLEAR_100, cleared, &mut unlocked);
        self.raise(ids::CLEAR_1000, cleared, &mut unlocked);
        self.bump(ids::STAR_MATCH, summary.star_matches, &mut unlocked);
        self.bump(ids::LINE_MATCH, summary.line_matches, &mut unlocked);
        let played = u32::try_from(self.statistics.total_play_time_secs).unwrap_or(u32::MAX);
        self.raise(ids::PLAY_HOUR, played, &mut unlocked);

        rewards.achievement_shards = self.pay_out(&mut unlocked, true);
        rewards.unlocked = unlocked;

        info!(
            score,
            shards = rewards.shards_earned + rewards.achievement_shards,
            high_score = self.high_score,
            games_played = self.games_played,
            "game recorded"
        );
        rewards
    }

    // -------------------------------------------------------------------------
    // Purchases
    // -------------------------------------------------------------------------

    /// Buy a locked core. Returns the price paid.
    pub fn unlock_core(&mut self, color: NodeColor) -> Result<u32, PurchaseError> {
        let index = self.cores.index_of(color).ok_or(PurchaseError::UnknownCore(color))?;
        if self.cores.get(color).is_some_and(|c| c.unlocked) {
            return Err(PurchaseError::AlreadyUnlocked);
        }
        let cost = NexusCore::unlock_cost(index).ok_or(PurchaseError::UnknownCore(color))?;
        self.spend(cost)?;
        self.cores.unlock(color);

        let mut unlocked = Vec::new();
        let count = self.cores.unlocked_count() as u32;
        self.raise(ids::UNLOCK_ALL_CORES, count, &mut unlocked);
        self.pay_out(&mut unlocked, false);

        debug!(?color, cost, "core unlocked");
        Ok(cost)
    }

    /// Buy the next level of an unlocked core. Returns the price paid.
    pub fn upgrade_core(&mut self, color: NodeColor) -> Result<u32, PurchaseError> {
        let core = self.cores.get(color).ok_or(PurchaseError::UnknownCore(color))?;
        if !core.unlocked {
            return Err(PurchaseError::CoreLocked);
        }
        let cost = core.upgrade_cost().ok_or(PurchaseError::MaxLevel)?;
        self.spend(cost)?;
        self.cores.upgrade(color);

        if self.cores.get(color).is_some_and(|c| c.level == MAX_CORE_LEVEL) {
            let mut unlocked = Vec::new();
            self.bump(ids::MAX_UPGRADE, 1, &mut unlocked);
            self.pay_out(&mut unlocked, false);
        }

        debug!(?color, cost, "core upgraded");
        Ok(cost)
    }

    fn spend(&mut self, cost: u32) -> Result<(), PurchaseError> {
        if self.shards < cost {
            return Err(PurchaseError::InsufficientShards {
                needed: cost,
                available: self.shards,
            });
        }
        self.shards -= cost;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Daily challenge
    // -------------------------------------------------------------------------

    /// A daily is available if none was completed yet or the last one was
    /// at least a day before `today`.
    pub fn daily_available(&self, today: NaiveDate) -> bool {
        self.last_daily
            .map_or(true, |last| (today - last).num_days() >= 1)
    }

    /// Mark today's daily as done and pay out. False if already done today.
    pub fn complete_daily(&mut self, today: NaiveDate) -> bool {
        if !self.daily_available(today) {
            return false;
        }
        self.last_daily = Some(today);
        self.shards = self.shards.saturating_add(DAILY_REWARD_SHARDS);

        let mut unlocked = Vec::new();
        self.bump(ids::DAILY_COMPLETE, 1, &mut unlocked);
        self.pay_out(&mut unlocked, true);

        info!(%today, "daily challenge completed");
        true
    }

    // -------------------------------------------------------------------------
    // Achievement helpers
    // -------------------------------------------------------------------------

    /// Add `amount` progress.
    fn bump(&mut self, id: &str, amount: u32, unlocked: &mut Vec<String>) {
        if amount == 0 {
            return;
        }
        if let Some(achievement) = self.achievements.iter_mut().find(|a| a.id == id) {
            if achievement.update_progress(amount) {
                unlocked.push(achievement.id.clone());
            }
        }
    }

    /// Raise progress to at least `value`.
    fn raise(&mut self, id: &str, value: u32, unlocked: &mut Vec<String>) {
        let current = self.achievement(id).map_or(0, |a| a.progress);
        self.bump(id, value.saturating_sub(current), unlocked);
    }

    /// Pay out rewards for everything in `unlocked`. With `check_balance`
    /// the shard achievement is tested against the growing balance too.
    /// Returns shards paid.
    fn pay_out(&mut self, unlocked: &mut Vec<String>, check_balance: bool) -> u32 {
        let mut paid: u32 = 0;
        let mut next = 0;
        loop {
            let reward: u32 = unlocked[next..]
                .iter()
                .map(|id| self.achievement(id).map_or(0, |a| a.reward_shards))
                .sum();
            self.shards = self.shards.saturating_add(reward);
            paid = paid.saturating_add(reward);
            next = unlocked.len();

            if check_balance {
                let balance = self.shards;
                self.raise(ids::SHARDS_10000, balance, unlocked);
            }
            if unlocked.len() == next {
                break;
            }
        }
        for id in unlocked.iter() {
            debug!(id = id.as_str(), "achievement unlocked");
        }
        paid
    }
}
