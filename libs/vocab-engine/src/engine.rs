//! Public engine operations.
//!
//! Each method locks the repository and runs exactly one transaction. All
//! inputs and outputs are plain data records; store handles never cross
//! this boundary.

use crate::db::error::StoreError;
use crate::db::repository::{
    ReviewRepository, SqliteRepository, StatsRepository, UserRepository, WordRepository,
};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Mutex;
use vocab_core::algorithm::Milestone;
use vocab_core::{
    DueReview, Level, Outcome, ReviewRecord, ReviewStats, SpacedRepetitionAlgorithm, UserProfile,
    Word,
};

type Result<T> = std::result::Result<T, StoreError>;

/// The scheduling engine: review store plus algorithm.
pub struct Engine {
    repository: Mutex<SqliteRepository>,
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
}

impl Engine {
    /// Open the engine over a store at path, creating it if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::with_repository(SqliteRepository::open(path)?))
    }

    /// Open the engine over an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::with_repository(SqliteRepository::open_in_memory()?))
    }

    /// Wrap an already-opened repository with the default algorithm.
    pub fn with_repository(repository: SqliteRepository) -> Self {
        Self::with_algorithm(repository, Box::new(Milestone::default()))
    }

    /// Wrap a repository with a specific scheduling algorithm.
    pub fn with_algorithm(
        repository: SqliteRepository,
        algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    ) -> Self {
        Self {
            repository: Mutex::new(repository),
            algorithm,
        }
    }

    /// Fetch the profile for a user, creating it with the default level on
    /// first contact.
    pub fn get_or_create_user(&self, user_id: i64, default_level: Level) -> Result<UserProfile> {
        let mut repo = self.repository.lock().expect("repository lock");
        repo.get_or_create_user(user_id, default_level)
    }

    /// Change a user's difficulty level.
    pub fn set_user_level(&self, user_id: i64, level: Level) -> Result<()> {
        let repo = self.repository.lock().expect("repository lock");
        repo.set_user_level(user_id, level)
    }

    /// Add a word to the user's learned set. Idempotent.
    pub fn mark_word_learned(&self, user_id: i64, word_id: i64) -> Result<()> {
        let mut repo = self.repository.lock().expect("repository lock");
        repo.mark_word_learned(user_id, word_id)
    }

    /// Bump the user's lifetime quiz tallies. Unrelated to review state.
    pub fn record_quiz_result(&self, user_id: i64, correct: bool) -> Result<()> {
        let repo = self.repository.lock().expect("repository lock");
        repo.record_quiz_result(user_id, correct)
    }

    /// Look up a catalog word.
    pub fn lookup_word(&self, word_id: i64) -> Result<Word> {
        let repo = self.repository.lock().expect("repository lock");
        repo.get_word(word_id)?
            .ok_or(StoreError::WordNotFound(word_id))
    }

    /// Catalog words for a difficulty level, in catalog order.
    pub fn words_by_level(&self, level: Level, limit: usize) -> Result<Vec<Word>> {
        let repo = self.repository.lock().expect("repository lock");
        repo.get_words_by_level(level, limit)
    }

    /// Enroll a word into spaced repetition for a user.
    ///
    /// Validates both foreign keys. Idempotent: if the pair is already
    /// enrolled, the existing record is returned unchanged.
    pub fn enroll(&self, user_id: i64, word_id: i64, today: NaiveDate) -> Result<ReviewRecord> {
        let mut repo = self.repository.lock().expect("repository lock");
        let initial = self.algorithm.initial_state(today);
        let record = repo.enroll(user_id, word_id, &initial)?;
        tracing::debug!(user_id, word_id, review_id = record.id, "enrolled");
        Ok(record)
    }

    /// Record one recall outcome for a review record.
    ///
    /// A single atomic read-modify-write; concurrent outcomes on the same
    /// record serialize rather than losing updates.
    pub fn record_outcome(
        &self,
        review_id: i64,
        outcome: Outcome,
        today: NaiveDate,
    ) -> Result<ReviewRecord> {
        let mut repo = self.repository.lock().expect("repository lock");
        let record = repo.record_outcome(review_id, outcome, today, self.algorithm.as_ref())?;
        tracing::debug!(
            review_id,
            correct = outcome.is_correct(),
            interval_days = record.state.interval_days,
            "outcome recorded"
        );
        Ok(record)
    }

    /// Review records due on or before `today`, oldest due date first
    /// (creation order breaking ties), joined with their words.
    pub fn due_reviews(&self, user_id: i64, limit: usize, today: NaiveDate)
        -> Result<Vec<DueReview>> {
        let repo = self.repository.lock().expect("repository lock");
        repo.get_due_reviews(user_id, limit, today)
    }

    /// Number of records due on or before `today`, without a limit.
    pub fn due_count(&self, user_id: i64, today: NaiveDate) -> Result<usize> {
        let repo = self.repository.lock().expect("repository lock");
        repo.count_due(user_id, today)
    }

    /// Summary statistics over the user's review records.
    pub fn stats(&self, user_id: i64, today: NaiveDate) -> Result<ReviewStats> {
        let repo = self.repository.lock().expect("repository lock");
        repo.get_review_stats(user_id, today)
    }
}
