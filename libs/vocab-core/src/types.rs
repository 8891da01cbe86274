//! Core types for the vocabulary trainer.

use crate::error::ParseLevelError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// CEFR difficulty level of a word (and of a learner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Default for Level {
    fn default() -> Self {
        Self::A1
    }
}

impl Level {
    /// Get the level as its storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "B1" => Ok(Self::B1),
            "B2" => Ok(Self::B2),
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

/// Result of a single recall attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    /// Map a correct/incorrect flag to an outcome.
    pub fn from_bool(correct: bool) -> Self {
        if correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// A vocabulary word from the catalog. Immutable from the engine's
/// perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word_id: i64,
    pub text: String,
    pub pronunciation: String,
    pub translation: String,
    pub example: String,
    pub level: Level,
}

/// A learner profile. Created on first contact, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub level: Level,
    /// Word ids the user has marked as learned.
    pub words_learned: Vec<i64>,
    /// Lifetime quiz tallies, unrelated to spaced repetition state.
    pub quiz_correct: u32,
    pub quiz_incorrect: u32,
    pub created_at: DateTime<Utc>,
}

/// Mutable scheduling state of a review record.
///
/// Invariants: `interval_days >= 1`, `ease_factor` in `[1.3, 2.5]`, and at
/// most one of the consecutive counters is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub interval_days: u32,
    pub next_review_date: NaiveDate,
    pub ease_factor: f64,
    pub consecutive_correct: u32,
    pub consecutive_incorrect: u32,
    pub total_reviews: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<NaiveDate>,
}

impl ReviewState {
    /// State of a freshly enrolled record: one-day interval, default ease,
    /// due immediately.
    pub fn initial(enrolled_on: NaiveDate) -> Self {
        Self {
            interval_days: 1,
            next_review_date: enrolled_on,
            ease_factor: 2.5,
            consecutive_correct: 0,
            consecutive_incorrect: 0,
            total_reviews: 0,
            last_review_date: None,
        }
    }

    /// Whether the record is due on the given date.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date <= today
    }
}

/// Per-user-per-word review record. At most one per (user, word) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: i64,
    pub user_id: i64,
    pub word_id: i64,
    #[serde(flatten)]
    pub state: ReviewState,
    pub created_at: DateTime<Utc>,
}

/// A due review record joined with its word for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueReview {
    pub review: ReviewRecord,
    pub word: Word,
}

/// Summary statistics over a user's review records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_words: usize,
    pub due_today: usize,
    /// Mean ease factor across records, rounded to two decimals. Zero when
    /// the user has no records.
    pub avg_ease_factor: f64,
    pub total_reviews: u64,
}
