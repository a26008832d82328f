//! Component configuration
//!
//! Every component takes an immutable config struct, validated once at
//! construction. Invalid values (non-positive windows, zero request caps,
//! unordered cohort thresholds) are [`PulseError::ConfigurationError`] at
//! startup and are never re-checked per call.
//!
//! ## Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | Admission window | 60 000 ms, 5 requests |
//! | Block cap | 300 000 ms |
//! | Session cooldown | 3 h, 10 sessions/day, 30 min max |
//! | Referral | base 50, depth 3, decay 0.3/level, floor 0.1 |
//! | Cohorts | Founders < 1 000 < Builders < 10 000 < Supporters < 100 000 |

use serde::{Deserialize, Serialize};

use crate::error::{PulseError, Result};
use crate::types::Generation;

/// Fixed-window admission control settings
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Counting window in milliseconds
    pub window_ms: i64,
    /// Requests allowed per window per key
    pub max_requests: u32,
    /// Upper bound on exponential-backoff block duration in milliseconds
    pub block_cap_ms: i64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 5,
            block_cap_ms: 300_000,
        }
    }
}

impl GovernorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_ms <= 0 {
            return Err(PulseError::ConfigurationError(format!(
                "window_ms must be positive, got {}",
                self.window_ms
            )));
        }
        if self.max_requests == 0 {
            return Err(PulseError::ConfigurationError(
                "max_requests must be at least 1".to_string(),
            ));
        }
        if self.block_cap_ms < self.window_ms {
            return Err(PulseError::ConfigurationError(format!(
                "block_cap_ms ({}) must be at least window_ms ({})",
                self.block_cap_ms, self.window_ms
            )));
        }
        Ok(())
    }
}

/// Play-session gate settings
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minimum gap between the end of one session and the start of the
    /// next, in milliseconds
    pub cooldown_ms: i64,
    /// Sessions allowed per day; the daily counter resets on an external
    /// clock tick, not here
    pub max_daily_sessions: u32,
    /// Idle duration after which an active session is force-ended,
    /// in milliseconds
    pub max_session_ms: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 3 * 3600 * 1000,
            max_daily_sessions: 10,
            max_session_ms: 30 * 60 * 1000,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cooldown_ms < 0 {
            return Err(PulseError::ConfigurationError(format!(
                "cooldown_ms must be non-negative, got {}",
                self.cooldown_ms
            )));
        }
        if self.max_daily_sessions == 0 {
            return Err(PulseError::ConfigurationError(
                "max_daily_sessions must be at least 1".to_string(),
            ));
        }
        if self.max_session_ms <= 0 {
            return Err(PulseError::ConfigurationError(format!(
                "max_session_ms must be positive, got {}",
                self.max_session_ms
            )));
        }
        Ok(())
    }
}

/// Referral reward propagation settings
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ReferralConfig {
    /// Base reward in power tokens at depth 0, before decay and bonus
    pub base_reward: u64,
    /// Ancestors rewarded per completed referral; the walk stops here
    pub max_depth: u32,
    /// Decay subtracted from the reward factor per level of depth
    pub decay_per_level: f64,
    /// Lower bound on the decay factor
    pub decay_floor: f64,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            base_reward: 50,
            max_depth: 3,
            decay_per_level: 0.3,
            decay_floor: 0.1,
        }
    }
}

impl ReferralConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(PulseError::ConfigurationError(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.decay_per_level) {
            return Err(PulseError::ConfigurationError(format!(
                "decay_per_level must be in [0, 1], got {}",
                self.decay_per_level
            )));
        }
        if !(0.0..=1.0).contains(&self.decay_floor) {
            return Err(PulseError::ConfigurationError(format!(
                "decay_floor must be in [0, 1], got {}",
                self.decay_floor
            )));
        }
        Ok(())
    }
}

/// Generation cohort thresholds and bonus table
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Population below which new players are Founders
    pub founders_below: u64,
    /// Population below which new players are Builders
    pub builders_below: u64,
    /// Population below which new players are Supporters
    pub supporters_below: u64,
    /// Additive bonus per cohort, applied as a `(1 + bonus)` factor
    pub founders_bonus: f64,
    pub builders_bonus: f64,
    pub supporters_bonus: f64,
    pub mass_movement_bonus: f64,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            founders_below: 1_000,
            builders_below: 10_000,
            supporters_below: 100_000,
            founders_bonus: Generation::Founders.default_bonus(),
            builders_bonus: Generation::Builders.default_bonus(),
            supporters_bonus: Generation::Supporters.default_bonus(),
            mass_movement_bonus: Generation::MassMovement.default_bonus(),
        }
    }
}

impl CohortConfig {
    pub fn validate(&self) -> Result<()> {
        if self.founders_below == 0 {
            return Err(PulseError::ConfigurationError(
                "founders_below must be positive".to_string(),
            ));
        }
        if self.founders_below >= self.builders_below
            || self.builders_below >= self.supporters_below
        {
            return Err(PulseError::ConfigurationError(format!(
                "cohort thresholds must be strictly increasing: {} < {} < {}",
                self.founders_below, self.builders_below, self.supporters_below
            )));
        }
        for (name, bonus) in [
            ("founders_bonus", self.founders_bonus),
            ("builders_bonus", self.builders_bonus),
            ("supporters_bonus", self.supporters_bonus),
            ("mass_movement_bonus", self.mass_movement_bonus),
        ] {
            if !bonus.is_finite() || bonus < 0.0 {
                return Err(PulseError::ConfigurationError(format!(
                    "{} must be a non-negative finite number, got {}",
                    name, bonus
                )));
            }
        }
        Ok(())
    }

    /// Bonus for a cohort under this configuration.
    pub fn bonus_for(&self, generation: Generation) -> f64 {
        match generation {
            Generation::Founders => self.founders_bonus,
            Generation::Builders => self.builders_bonus,
            Generation::Supporters => self.supporters_bonus,
            Generation::MassMovement => self.mass_movement_bonus,
        }
    }
}

/// Leaderboard score weights
///
/// `score = influence*influence_weight + supporters*supporters_weight
///        + level*level_weight + referrals*referrals_weight`
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub influence_weight: f64,
    pub supporters_weight: f64,
    pub level_weight: f64,
    pub referrals_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        // 0.4, 0.3*10, 0.2*100, 0.1*50: the source's normalized weights
        // pre-multiplied by their per-stat scale factors
        Self {
            influence_weight: 0.4,
            supporters_weight: 3.0,
            level_weight: 20.0,
            referrals_weight: 5.0,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.influence_weight,
            self.supporters_weight,
            self.level_weight,
            self.referrals_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PulseError::ConfigurationError(
                "score weights must be non-negative finite numbers".to_string(),
            ));
        }
        if weights.iter().all(|w| *w == 0.0) {
            return Err(PulseError::ConfigurationError(
                "at least one score weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
