//! Generation cohort assignment
//!
//! Each player is assigned a cohort exactly once, at creation, from the
//! total number of players ever created. The assigner owns that total as
//! an atomic sequence: `assign` is a fetch-and-increment, so two
//! concurrent creations can never read the same population and both land
//! in a cohort that should have closed. Callers that read a population
//! count externally use `assign_at`, whose compare-exchange surfaces
//! [`PulseError::AssignmentConflict`] for a retry with a fresh count.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use pulse_core::{CohortConfig, Generation, PulseError, Result};

/// Result of a cohort assignment, permanent for the player's lifetime
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CohortAssignment {
    pub generation: Generation,
    /// Additive bonus fixed at assignment, applied as `(1 + bonus)`
    pub bonus: f64,
    /// Zero-based position in the all-time creation sequence
    pub population_ordinal: u64,
}

/// Serialization point for all player creations
pub struct GenerationCohortAssigner {
    config: CohortConfig,
    /// Total players ever created; the ordinal handed to the next player
    population: AtomicU64,
}

impl GenerationCohortAssigner {
    /// Create an assigner, rejecting invalid configuration.
    ///
    /// `initial_population` seeds the sequence when restoring from an
    /// existing player store.
    pub fn new(config: CohortConfig, initial_population: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            population: AtomicU64::new(initial_population),
        })
    }

    /// Assign the next cohort: atomically claims the next population
    /// ordinal and classifies it. Never conflicts.
    pub fn assign(&self) -> CohortAssignment {
        let ordinal = self.population.fetch_add(1, Ordering::SeqCst);
        let assignment = self.classify(ordinal);
        tracing::debug!(
            ordinal,
            generation = %assignment.generation,
            "cohort assigned"
        );
        assignment
    }

    /// Assign against an externally read population count.
    ///
    /// Fails with [`PulseError::AssignmentConflict`] when another creation
    /// claimed the ordinal first; the caller re-reads and retries.
    pub fn assign_at(&self, expected_population: u64) -> Result<CohortAssignment> {
        self.population
            .compare_exchange(
                expected_population,
                expected_population + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map_err(|found| PulseError::AssignmentConflict {
                expected: expected_population,
                found,
            })?;
        Ok(self.classify(expected_population))
    }

    /// Total players ever created.
    pub fn population(&self) -> u64 {
        self.population.load(Ordering::SeqCst)
    }

    fn classify(&self, ordinal: u64) -> CohortAssignment {
        let generation = Generation::from_population(ordinal, &self.config);
        CohortAssignment {
            generation,
            bonus: self.config.bonus_for(generation),
            population_ordinal: ordinal,
        }
    }
}
