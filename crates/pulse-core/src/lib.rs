//! # Pulse Core
//!
//! Shared types for the Pulse engagement platform core: player records,
//! generation cohorts, the error taxonomy, and validated configuration.
//!
//! The core gates and prices player actions. Admission and session gating
//! decide *whether* an action proceeds; the economy crates decide *what
//! happens economically* once it does:
//!
//! ```text
//!  inbound action
//!       │
//!       ▼
//!  RequestGovernor ──► Blocked(retry_after)
//!       │ Allowed
//!       ▼
//!  SessionScheduler ──► Cooldown(wait)        (start-session actions only)
//!       │ Allowed
//!       ▼
//!  ReferralRewardPropagator / GenerationCohortAssigner / LeaderboardScorer
//! ```
//!
//! All time parameters are explicit epoch milliseconds so that callers own
//! the clock and tests are deterministic; [`clock::now_ms`] captures wall
//! time for production callers.

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        CohortConfig, GovernorConfig, ReferralConfig, ScoreWeights, SessionConfig,
    };
    pub use crate::error::{PulseError, Result};
    pub use crate::types::{Generation, Player, PlayerId, ReferralCode};
}
