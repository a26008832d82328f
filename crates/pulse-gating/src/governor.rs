//! Fixed-window admission control with exponential backoff
//!
//! One [`AdmissionRecord`] per opaque key (typically `identifier:action`),
//! created lazily on the key's first action. Exceeding `max_requests`
//! within a window starts a violation episode: the key is blocked for
//! `window_ms * 2^(episode-1)`, capped at `block_cap_ms`. Requests that
//! arrive while a block is active are rejected without touching the
//! counter, so episodes advance once per new block, not per rejected
//! request. Episode history survives window resets and is forgotten only
//! when [`RequestGovernor::prune`] drops the record, so a key that keeps
//! re-offending keeps doubling until the cap.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use pulse_core::clock::ms_to_secs_ceil;
use pulse_core::{GovernorConfig, Result};

/// Per-key admission counter state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRecord {
    /// Requests observed in the current window
    pub count: u32,
    /// End of the current counting window, epoch ms
    pub window_reset_at: i64,
    /// Active block expiry, epoch ms; while set and in the future,
    /// `count` and `window_reset_at` are not consulted
    pub blocked_until: Option<i64>,
    /// Violation episodes so far; drives the backoff exponent
    pub violations: u32,
}

/// Outcome of an admission check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionDecision {
    /// Action may proceed
    Allowed,
    /// Action rejected; retry after the given delay
    Blocked { retry_after_ms: i64 },
}

impl AdmissionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Wait time in whole seconds for user-facing responses, rounded up.
    pub fn retry_after_secs(&self) -> i64 {
        match self {
            Self::Allowed => 0,
            Self::Blocked { retry_after_ms } => ms_to_secs_ceil(*retry_after_ms),
        }
    }
}

/// Per-key admission controller
///
/// The record store is a single `Mutex<HashMap>`; each `admit` call is one
/// critical section, so concurrent calls for the same key cannot both read
/// a stale count and slip past the threshold.
pub struct RequestGovernor {
    config: GovernorConfig,
    records: Mutex<HashMap<String, AdmissionRecord>>,
}

impl RequestGovernor {
    /// Create a governor, rejecting invalid configuration.
    pub fn new(config: GovernorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            records: Mutex::new(HashMap::new()),
        })
    }

    /// Decide whether the action behind `key` may proceed at `now_ms`.
    ///
    /// Never fails; every outcome is an [`AdmissionDecision`].
    pub fn admit(&self, key: &str, now_ms: i64) -> AdmissionDecision {
        let mut records = self.records.lock();

        let record = match records.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(AdmissionRecord {
                    count: 1,
                    window_reset_at: now_ms + self.config.window_ms,
                    blocked_until: None,
                    violations: 0,
                });
                return AdmissionDecision::Allowed;
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        // An active block short-circuits everything else
        if let Some(blocked_until) = record.blocked_until {
            if now_ms < blocked_until {
                return AdmissionDecision::Blocked {
                    retry_after_ms: blocked_until - now_ms,
                };
            }
        }

        // Window elapsed: fresh window, expired block cleared. Episode
        // history stays until prune drops the record.
        if now_ms > record.window_reset_at {
            record.count = 1;
            record.window_reset_at = now_ms + self.config.window_ms;
            record.blocked_until = None;
            return AdmissionDecision::Allowed;
        }

        record.count += 1;
        if record.count > self.config.max_requests {
            record.violations += 1;
            let block_ms = self.block_duration_ms(record.violations);
            record.blocked_until = Some(now_ms + block_ms);
            tracing::warn!(
                key,
                episode = record.violations,
                block_ms,
                "admission limit exceeded, key blocked"
            );
            return AdmissionDecision::Blocked {
                retry_after_ms: block_ms,
            };
        }

        AdmissionDecision::Allowed
    }

    /// `window_ms * 2^(episode-1)`, capped at `block_cap_ms`.
    fn block_duration_ms(&self, episode: u32) -> i64 {
        let shift = episode.saturating_sub(1);
        // A shift this large would overflow before the cap applies
        if shift >= self.config.window_ms.leading_zeros().saturating_sub(1) {
            return self.config.block_cap_ms;
        }
        (self.config.window_ms << shift).min(self.config.block_cap_ms)
    }

    /// Drop records whose window and block have both elapsed.
    ///
    /// Invoked from a periodic maintenance tick, like the daily session
    /// reset; `admit` itself never pays the sweep cost. This is also the
    /// point where a reformed key's violation history is forgiven.
    pub fn prune(&self, now_ms: i64) -> usize {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, record| {
            let window_live = now_ms <= record.window_reset_at;
            let block_live = record.blocked_until.is_some_and(|until| now_ms < until);
            window_live || block_live
        });
        before - records.len()
    }

    /// Number of tracked keys.
    pub fn tracked_keys(&self) -> usize {
        self.records.lock().len()
    }

    /// Snapshot of one key's record, if tracked.
    pub fn record(&self, key: &str) -> Option<AdmissionRecord> {
        self.records.lock().get(key).copied()
    }
}
