//! Referral reward propagation
//!
//! Referrals form a forest: each player has at most one parent (the player
//! whose code they joined with), and no player is its own ancestor. When a
//! referral completes, every ancestor within `max_depth` hops receives a
//! reward that decays with depth:
//!
//! `reward = floor(base * max(decay_floor, 1 - depth * decay_per_level) * (1 + bonus))`
//!
//! Each edge is rewarded exactly once. The cycle check, the rewarded-flag
//! check, and the grant itself happen as one unit under the forest's write
//! lock, so concurrent retries cannot double-credit.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use pulse_core::{PlayerId, PulseError, ReferralConfig, Result};

/// One granted reward, returned per rewarded ancestor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralReward {
    pub player_id: PlayerId,
    /// Hops from the referred player: 0 is the direct referrer
    pub depth: u32,
    /// Power tokens granted
    pub amount: u64,
}

/// Immutable record of one referral, created once per completed referral
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralEdge {
    pub referrer: PlayerId,
    pub referred: PlayerId,
    pub created_at: i64,
    /// Set when rewards for this edge have been granted
    pub rewarded: bool,
}

#[derive(Default)]
struct ForestState {
    /// Parent pointers; key is the referred player
    parent: HashMap<PlayerId, PlayerId>,
    /// Edge per referred player, carrying the rewarded flag
    edges: HashMap<PlayerId, ReferralEdge>,
    /// Generation bonus per registered player
    bonuses: HashMap<PlayerId, f64>,
    /// Lifetime tokens granted per player through referrals
    granted: HashMap<PlayerId, u64>,
}

/// Walks referral chains upward and grants decayed rewards once per edge
pub struct ReferralRewardPropagator {
    config: ReferralConfig,
    state: RwLock<ForestState>,
}

impl ReferralRewardPropagator {
    /// Create a propagator, rejecting invalid configuration.
    pub fn new(config: ReferralConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RwLock::new(ForestState::default()),
        })
    }

    /// Register a player's fixed generation bonus so the walk can price
    /// their rewards. Called once per player at creation.
    pub fn register_player(&self, id: PlayerId, generation_bonus: f64) {
        self.state.write().bonuses.insert(id, generation_bonus);
    }

    /// Record the referral edge `referrer -> referred`.
    ///
    /// Rejects self-referrals, a second parent for `referred`, and edges
    /// that would make `referred` its own ancestor. Recording grants
    /// nothing; [`Self::on_referral_completed`] does.
    pub fn link(&self, referrer: PlayerId, referred: PlayerId, now_ms: i64) -> Result<()> {
        let mut state = self.state.write();

        if referrer == referred {
            return Err(PulseError::InvalidReferral(format!(
                "player {} cannot refer themselves",
                referred
            )));
        }
        if state.parent.contains_key(&referred) {
            return Err(PulseError::InvalidReferral(format!(
                "player {} already has a referrer",
                referred
            )));
        }
        // Bounded ancestor walk; self-referral is the depth-0 case above
        if self.is_ancestor(&state, referred, referrer) {
            return Err(PulseError::InvalidReferral(format!(
                "linking {} under {} would create a cycle",
                referred, referrer
            )));
        }

        state.parent.insert(referred, referrer);
        state.edges.insert(
            referred,
            ReferralEdge {
                referrer,
                referred,
                created_at: now_ms,
                rewarded: false,
            },
        );
        Ok(())
    }

    /// Grant rewards for the completed referral of `referred`, walking up
    /// to `max_depth` ancestors.
    ///
    /// Exactly-once per edge: a second invocation fails with
    /// [`PulseError::InvalidReferral`] and grants nothing. All-or-nothing:
    /// if any ancestor in range is unregistered, nothing is credited and
    /// the edge stays unrewarded.
    pub fn on_referral_completed(&self, referred: PlayerId) -> Result<Vec<ReferralReward>> {
        let mut state = self.state.write();

        let edge = *state
            .edges
            .get(&referred)
            .ok_or_else(|| {
                PulseError::InvalidReferral(format!("no referral edge recorded for {}", referred))
            })?;
        if edge.rewarded {
            return Err(PulseError::InvalidReferral(format!(
                "referral of {} has already been rewarded",
                referred
            )));
        }

        // Price the full chain before touching any balance
        let mut rewards = Vec::new();
        let mut current = Some(edge.referrer);
        for depth in 0..self.config.max_depth {
            let Some(ancestor) = current else { break };
            let bonus = *state.bonuses.get(&ancestor).ok_or_else(|| {
                PulseError::InvalidReferral(format!("referrer {} is not registered", ancestor))
            })?;
            rewards.push(ReferralReward {
                player_id: ancestor,
                depth,
                amount: self.reward_at_depth(depth, bonus),
            });
            current = state.parent.get(&ancestor).copied();
        }

        // Commit: mark the edge and credit every ancestor
        if let Some(e) = state.edges.get_mut(&referred) {
            e.rewarded = true;
        }
        for reward in &rewards {
            *state.granted.entry(reward.player_id).or_insert(0) += reward.amount;
        }
        tracing::debug!(
            referred = %referred,
            ancestors = rewards.len(),
            "referral rewards granted"
        );
        Ok(rewards)
    }

    /// Direct referrer of `id`, if any.
    pub fn parent_of(&self, id: PlayerId) -> Option<PlayerId> {
        self.state.read().parent.get(&id).copied()
    }

    /// Lifetime tokens granted to `id` through referrals.
    pub fn total_granted(&self, id: PlayerId) -> u64 {
        self.state.read().granted.get(&id).copied().unwrap_or(0)
    }

    /// `floor(base * max(decay_floor, 1 - depth * decay_per_level) * (1 + bonus))`
    fn reward_at_depth(&self, depth: u32, generation_bonus: f64) -> u64 {
        let decay = (1.0 - depth as f64 * self.config.decay_per_level).max(self.config.decay_floor);
        (self.config.base_reward as f64 * decay * (1.0 + generation_bonus)).floor() as u64
    }

    /// Whether `candidate` appears among the first `max_depth` ancestors
    /// of `of`.
    fn is_ancestor(&self, state: &ForestState, candidate: PlayerId, of: PlayerId) -> bool {
        let mut current = state.parent.get(&of).copied();
        for _ in 0..self.config.max_depth {
            match current {
                Some(ancestor) if ancestor == candidate => return true,
                Some(ancestor) => current = state.parent.get(&ancestor).copied(),
                None => return false,
            }
        }
        false
    }
}
