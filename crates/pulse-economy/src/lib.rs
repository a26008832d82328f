//! # Pulse Economy
//!
//! What happens economically once a gated action proceeds:
//!
//! - **GenerationCohortAssigner**: assigns a permanent cohort and bonus to
//!   each new player from the total population at creation time, behind a
//!   single atomic sequence so cohort boundaries hold under load.
//! - **ReferralRewardPropagator**: walks the referral forest upward from a
//!   completed referral and grants depth-decayed rewards, exactly once per
//!   edge.
//! - **LeaderboardScorer**: pure weighted scoring over player stats, plus
//!   deterministic ranking with rank-movement deltas.
//!
//! Leaderboard snapshots are derived views; player records remain the
//! source of truth.

pub mod cohort;
pub mod leaderboard;
pub mod referral;

pub use cohort::*;
pub use leaderboard::*;
pub use referral::*;
