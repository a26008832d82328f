//! Leaderboard scoring and ranking
//!
//! Scoring is a pure weighted sum over player stats; ranking sorts the
//! scored players and attaches rank-movement deltas against a previous
//! snapshot. Snapshots are ephemeral views recomputed on demand, never a
//! source of truth.
//!
//! Ordering is fully deterministic: descending score, then earliest
//! `joined_at`, then lowest player id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use pulse_core::{Player, PlayerId, Result, ScoreWeights};

/// Rank change relative to the previous snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankMovement {
    /// Climbed this many places
    Up(u32),
    /// Dropped this many places
    Down(u32),
    Unchanged,
    /// Not present in the previous snapshot
    New,
}

impl RankMovement {
    /// `delta = previous - current`: positive is a climb.
    pub fn from_ranks(current: u32, previous: Option<u32>) -> Self {
        match previous {
            None => Self::New,
            Some(prev) => {
                let delta = prev as i64 - current as i64;
                match delta {
                    0 => Self::Unchanged,
                    d if d > 0 => Self::Up(d as u32),
                    d => Self::Down((-d) as u32),
                }
            }
        }
    }
}

impl std::fmt::Display for RankMovement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up(n) => write!(f, "up {}", n),
            Self::Down(n) => write!(f, "down {}", n),
            Self::Unchanged => write!(f, "unchanged"),
            Self::New => write!(f, "new"),
        }
    }
}

/// One row of a derived leaderboard snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub score: f64,
    /// 1-based
    pub rank: u32,
    pub previous_rank: Option<u32>,
    pub movement: RankMovement,
}

/// Pure scoring and ranking over player stats
pub struct LeaderboardScorer {
    weights: ScoreWeights,
}

impl LeaderboardScorer {
    /// Create a scorer, rejecting invalid weights.
    pub fn new(weights: ScoreWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Weighted score for one player. Pure and deterministic.
    pub fn score(&self, player: &Player) -> f64 {
        player.influence as f64 * self.weights.influence_weight
            + player.supporters_count as f64 * self.weights.supporters_weight
            + player.level as f64 * self.weights.level_weight
            + player.referrals_count as f64 * self.weights.referrals_weight
    }

    /// Rank players against a previous `player -> rank` snapshot.
    pub fn rank(
        &self,
        players: &[Player],
        previous: &HashMap<PlayerId, u32>,
    ) -> Vec<LeaderboardEntry> {
        let mut scored: Vec<(f64, &Player)> =
            players.iter().map(|p| (self.score(p), p)).collect();
        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .total_cmp(score_a)
                .then_with(|| a.joined_at.cmp(&b.joined_at))
                .then_with(|| a.id.cmp(&b.id))
        });

        scored
            .into_iter()
            .enumerate()
            .map(|(i, (score, player))| {
                let rank = i as u32 + 1;
                let previous_rank = previous.get(&player.id).copied();
                LeaderboardEntry {
                    player_id: player.id,
                    score,
                    rank,
                    previous_rank,
                    movement: RankMovement::from_ranks(rank, previous_rank),
                }
            })
            .collect()
    }
}
