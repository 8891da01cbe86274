//! Core scheduling library for the vocabulary trainer.
//!
//! Provides:
//! - The spaced repetition scheduling algorithm (milestone intervals with an
//!   additive ease factor)
//! - Shared plain-data types (Word, UserProfile, ReviewRecord, etc.)
//!
//! The crate is pure: no I/O and no clocks. Every scheduling operation takes
//! an explicit "today" so callers (and tests) control time.

pub mod algorithm;
pub mod error;
pub mod types;

pub use algorithm::{SchedulingResult, SpacedRepetitionAlgorithm};
pub use error::ParseLevelError;
pub use types::{
    DueReview, Level, Outcome, ReviewRecord, ReviewState, ReviewStats, UserProfile, Word,
};
