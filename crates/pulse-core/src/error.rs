//! Error types for Pulse core operations

use crate::types::PlayerId;
use thiserror::Error;

/// Result type alias for Pulse operations
pub type Result<T> = std::result::Result<T, PulseError>;

/// Errors that can occur in Pulse core operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PulseError {
    // === Admission & Sessions ===
    /// Key is rate limited; retry after the given wait
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: i64 },

    /// Session cooldown has not elapsed
    #[error("Session cooldown: wait {wait_secs}s")]
    SessionCooldown { wait_secs: i64 },

    // === Referrals ===
    /// Referral edge is invalid (cycle, self-referral, missing referrer,
    /// duplicate parent, or already-rewarded edge); never retry the same edge
    #[error("Invalid referral: {0}")]
    InvalidReferral(String),

    // === Cohort Assignment ===
    /// Population count moved between read and assignment; retry with a
    /// fresh count
    #[error("Cohort assignment conflict: expected population {expected}, found {found}")]
    AssignmentConflict { expected: u64, found: u64 },

    // === Lookups ===
    /// Player not registered with the component
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    // === General Errors ===
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration, rejected at construction
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Error code mapping for API responses
impl PulseError {
    /// Get the error code for API responses
    pub fn code(&self) -> u32 {
        match self {
            Self::RateLimited { .. } => 2001,
            Self::SessionCooldown { .. } => 2002,
            Self::InvalidReferral(_) => 2003,
            Self::AssignmentConflict { .. } => 2004,
            Self::PlayerNotFound(_) => 2005,
            Self::InvalidInput(_) => 2006,
            Self::ConfigurationError(_) => 9001,
        }
    }

    /// Check if the caller may retry the failed operation
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::SessionCooldown { .. }
                | Self::AssignmentConflict { .. }
        )
    }
}
