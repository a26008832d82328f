//! Core type definitions for the Pulse engagement platform
//!
//! Player records, generation cohorts, and referral codes. A player's
//! `generation` and `generation_bonus` are fixed at creation and never
//! change afterwards; everything else is mutable engagement state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CohortConfig;
use crate::error::{PulseError, Result};

/// Referral codes are 8 alphanumeric characters.
pub const REFERRAL_CODE_LEN: usize = 8;

const REFERRAL_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// PlayerId - Unique identifier for a player
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ReferralCode - 8-character alphanumeric code unique per player
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Generate a fresh code from the provided RNG.
    ///
    /// Uniqueness is the player store's responsibility; the caller retries
    /// on collision.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code: String = (0..REFERRAL_CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..REFERRAL_CODE_ALPHABET.len());
                REFERRAL_CODE_ALPHABET[idx] as char
            })
            .collect();
        Self(code)
    }

    /// Parse and validate an externally supplied code.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != REFERRAL_CODE_LEN {
            return Err(PulseError::InvalidInput(format!(
                "referral code must be {} characters, got {}",
                REFERRAL_CODE_LEN,
                s.len()
            )));
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(PulseError::InvalidInput(
                "referral code must be alphanumeric".to_string(),
            ));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferralCode({})", self.0)
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generation cohort, assigned once from total population at creation time
///
/// | Generation | Population at join | Bonus |
/// |--------------|--------------------|-------|
/// | Founders | below first threshold | 0.40 |
/// | Builders | below second threshold | 0.20 |
/// | Supporters | below third threshold | 0.10 |
/// | MassMovement | everyone after | 0.05 |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Generation {
    /// Founders: earliest joiners
    Founders,
    /// Builders: early growth phase
    Builders,
    /// Supporters: scaling phase
    Supporters,
    /// MassMovement: everyone after the supporter threshold
    MassMovement,
}

impl Generation {
    /// Canonical additive bonus, applied everywhere as a `(1 + bonus)` factor.
    pub fn default_bonus(&self) -> f64 {
        match self {
            Self::Founders => 0.40,
            Self::Builders => 0.20,
            Self::Supporters => 0.10,
            Self::MassMovement => 0.05,
        }
    }

    /// Classify from the total population at creation time.
    pub fn from_population(total_players: u64, config: &CohortConfig) -> Self {
        if total_players < config.founders_below {
            Self::Founders
        } else if total_players < config.builders_below {
            Self::Builders
        } else if total_players < config.supporters_below {
            Self::Supporters
        } else {
            Self::MassMovement
        }
    }

    /// Get cohort name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Founders => "Founders",
            Self::Builders => "Builders",
            Self::Supporters => "Supporters",
            Self::MassMovement => "Mass Movement",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Player engagement record
///
/// Owned by a single writer at a time (the caller enforces one in-flight
/// mutation per player). `generation` and `generation_bonus` are set once
/// by [`Player::new`] and must never be reassigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub level: u32,
    pub experience: u64,
    pub influence: u64,
    pub supporters_count: u64,
    pub power_tokens: u64,
    pub referral_code: ReferralCode,
    /// Parent in the referral forest; at most one, set at creation.
    pub referred_by: Option<PlayerId>,
    pub referrals_count: u32,
    pub generation: Generation,
    /// Fixed at assignment; additive, applied as `(1 + bonus)`.
    pub generation_bonus: f64,
    /// Epoch milliseconds.
    pub joined_at: i64,
    /// Epoch milliseconds; 0 when the player has never played.
    pub last_session_end: i64,
    pub sessions_today: u32,
}

impl Player {
    pub fn new(
        id: PlayerId,
        referral_code: ReferralCode,
        referred_by: Option<PlayerId>,
        generation: Generation,
        generation_bonus: f64,
        joined_at: i64,
    ) -> Self {
        Self {
            id,
            level: 1,
            experience: 0,
            influence: 0,
            supporters_count: 0,
            power_tokens: 0,
            referral_code,
            referred_by,
            referrals_count: 0,
            generation,
            generation_bonus,
            joined_at,
            last_session_end: 0,
            sessions_today: 0,
        }
    }
}
