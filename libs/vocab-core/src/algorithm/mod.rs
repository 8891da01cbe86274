//! Spaced repetition scheduling.

pub mod milestone;

use crate::types::{Outcome, ReviewState};
use chrono::NaiveDate;

pub use milestone::Milestone;

/// Result of scheduling a record after a recall attempt.
#[derive(Debug, Clone)]
pub struct SchedulingResult {
    pub new_state: ReviewState,
    pub next_due: NaiveDate,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the new state after a recall attempt on `today`.
    fn schedule(&self, state: &ReviewState, outcome: Outcome, today: NaiveDate)
        -> SchedulingResult;

    /// Initial state for a record enrolled on `enrolled_on`.
    fn initial_state(&self, enrolled_on: NaiveDate) -> ReviewState;
}
