//! Milestone interval algorithm.
//!
//! A simplified SM-2-style progression: fixed early milestones (1, 3, 7
//! days) followed by linear weekly growth, with an additive ease factor
//! bounded to [1.3, 2.5]. An incorrect answer resets the interval to one
//! day and the correct streak to zero.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::types::{Outcome, ReviewState};
use chrono::{Duration, NaiveDate};

/// Milestone algorithm with configurable ease parameters.
#[derive(Debug, Clone)]
pub struct Milestone {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub maximum_ease: f64,
    pub ease_reward: f64,
    pub ease_penalty: f64,
}

impl Default for Milestone {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            maximum_ease: 2.5,
            ease_reward: 0.1,
            ease_penalty: 0.2,
        }
    }
}

impl Milestone {
    /// Interval in days for the given correct streak (post-increment).
    ///
    /// Grows without bound; callers needing a ceiling must impose one.
    fn interval_for_streak(streak: u32) -> u32 {
        match streak {
            0 | 1 => 1,
            2 => 3,
            3 => 7,
            n => 7 + (n - 3) * 7,
        }
    }
}

impl SpacedRepetitionAlgorithm for Milestone {
    fn name(&self) -> &'static str {
        "milestone"
    }

    fn initial_state(&self, enrolled_on: NaiveDate) -> ReviewState {
        ReviewState {
            ease_factor: self.initial_ease,
            ..ReviewState::initial(enrolled_on)
        }
    }

    fn schedule(
        &self,
        state: &ReviewState,
        outcome: Outcome,
        today: NaiveDate,
    ) -> SchedulingResult {
        let (interval_days, ease_factor, correct, incorrect) = match outcome {
            Outcome::Correct => {
                let streak = state.consecutive_correct + 1;
                // Clamp after the additive step.
                let ease = (state.ease_factor + self.ease_reward).min(self.maximum_ease);
                (Self::interval_for_streak(streak), ease, streak, 0)
            }
            Outcome::Incorrect => {
                let ease = (state.ease_factor - self.ease_penalty).max(self.minimum_ease);
                (1, ease, 0, state.consecutive_incorrect + 1)
            }
        };

        let next_due = today + Duration::days(i64::from(interval_days));

        SchedulingResult {
            new_state: ReviewState {
                interval_days,
                next_review_date: next_due,
                ease_factor,
                consecutive_correct: correct,
                consecutive_incorrect: incorrect,
                total_reviews: state.total_reviews + 1,
                last_review_date: Some(today),
            },
            next_due,
        }
    }
}
