//! Repository pattern for review store access.

use crate::db::dates::{format_date, parse_date};
use crate::db::error::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use vocab_core::{
    DueReview, Level, Outcome, ReviewRecord, ReviewState, ReviewStats, SpacedRepetitionAlgorithm,
    UserProfile, Word,
};

type Result<T> = std::result::Result<T, StoreError>;

/// A word to insert into the catalog (id assigned by the store).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NewWord {
    pub text: String,
    pub pronunciation: String,
    pub translation: String,
    pub example: String,
    pub level: Level,
}

/// Repository for the word catalog. Read-only from the engine's
/// perspective; `add_word` exists for seeding and fixtures.
pub trait WordRepository {
    fn get_word(&self, word_id: i64) -> Result<Option<Word>>;
    fn get_words_by_level(&self, level: Level, limit: usize) -> Result<Vec<Word>>;
    fn add_word(&self, word: &NewWord) -> Result<i64>;
}

/// Repository for learner profiles.
pub trait UserRepository {
    fn get_user(&self, user_id: i64) -> Result<Option<UserProfile>>;
    fn get_or_create_user(&mut self, user_id: i64, default_level: Level) -> Result<UserProfile>;
    fn set_user_level(&self, user_id: i64, level: Level) -> Result<()>;
    fn mark_word_learned(&mut self, user_id: i64, word_id: i64) -> Result<()>;
    fn record_quiz_result(&self, user_id: i64, correct: bool) -> Result<()>;
}

/// Repository for review records.
pub trait ReviewRepository {
    fn get_review(&self, id: i64) -> Result<Option<ReviewRecord>>;
    fn get_review_for_pair(&self, user_id: i64, word_id: i64) -> Result<Option<ReviewRecord>>;

    /// Create the review record for a (user, word) pair, or return the
    /// existing one unchanged. Atomic with respect to the uniqueness check.
    fn enroll(&mut self, user_id: i64, word_id: i64, initial: &ReviewState)
        -> Result<ReviewRecord>;

    /// Apply one recall outcome as a single read-modify-write transaction.
    fn record_outcome(
        &mut self,
        id: i64,
        outcome: Outcome,
        today: NaiveDate,
        algorithm: &dyn SpacedRepetitionAlgorithm,
    ) -> Result<ReviewRecord>;

    fn get_due_reviews(&self, user_id: i64, limit: usize, today: NaiveDate)
        -> Result<Vec<DueReview>>;
    fn count_due(&self, user_id: i64, today: NaiveDate) -> Result<usize>;
}

/// Repository for statistics.
pub trait StatsRepository {
    fn get_review_stats(&self, user_id: i64, today: NaiveDate) -> Result<ReviewStats>;
}

/// SQLite implementation of the repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open the store at path, creating it if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    fn row_to_word(row: &rusqlite::Row) -> rusqlite::Result<Word> {
        Ok(Word {
            word_id: row.get(0)?,
            text: row.get(1)?,
            pronunciation: row.get(2)?,
            translation: row.get(3)?,
            example: row.get(4)?,
            level: Self::column_to_level(row, 5)?,
        })
    }

    fn row_to_review(row: &rusqlite::Row) -> rusqlite::Result<ReviewRecord> {
        Ok(ReviewRecord {
            id: row.get(0)?,
            user_id: row.get(1)?,
            word_id: row.get(2)?,
            state: ReviewState {
                interval_days: row.get(3)?,
                next_review_date: Self::column_to_date(row, 4)?,
                ease_factor: row.get(5)?,
                consecutive_correct: row.get(6)?,
                consecutive_incorrect: row.get(7)?,
                total_reviews: row.get(8)?,
                last_review_date: match row.get::<_, Option<String>>(9)? {
                    Some(s) => Some(
                        parse_date(&s)
                            .map_err(|e| conversion_error(9, e))?,
                    ),
                    None => None,
                },
            },
            created_at: Self::column_to_timestamp(row, 10)?,
        })
    }

    fn column_to_level(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Level> {
        let s: String = row.get(idx)?;
        s.parse::<Level>().map_err(|e| conversion_error(idx, e))
    }

    fn column_to_date(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDate> {
        let s: String = row.get(idx)?;
        parse_date(&s).map_err(|e| conversion_error(idx, e))
    }

    fn column_to_timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        let s: String = row.get(idx)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_error(idx, e))
    }

    fn user_exists(conn: &Connection, user_id: i64) -> Result<bool> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM users WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn word_exists(conn: &Connection, word_id: i64) -> Result<bool> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM words WHERE word_id = ?1",
                params![word_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn query_user(conn: &Connection, user_id: i64) -> Result<Option<UserProfile>> {
        let profile = conn
            .query_row(
                "SELECT user_id, level, quiz_correct, quiz_incorrect, created_at
                 FROM users WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(UserProfile {
                        user_id: row.get(0)?,
                        level: Self::column_to_level(row, 1)?,
                        words_learned: Vec::new(),
                        quiz_correct: row.get(2)?,
                        quiz_incorrect: row.get(3)?,
                        created_at: Self::column_to_timestamp(row, 4)?,
                    })
                },
            )
            .optional()?;

        let Some(mut profile) = profile else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT word_id FROM learned_words WHERE user_id = ?1 ORDER BY word_id",
        )?;
        profile.words_learned = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;

        Ok(Some(profile))
    }

    fn query_review(conn: &Connection, id: i64) -> Result<Option<ReviewRecord>> {
        conn.query_row(
            "SELECT id, user_id, word_id, interval_days, next_review_date, ease_factor,
                    consecutive_correct, consecutive_incorrect, total_reviews,
                    last_review_date, created_at
             FROM reviews WHERE id = ?1",
            params![id],
            Self::row_to_review,
        )
        .optional()
        .map_err(Into::into)
    }

    fn query_review_for_pair(
        conn: &Connection,
        user_id: i64,
        word_id: i64,
    ) -> Result<Option<ReviewRecord>> {
        conn.query_row(
            "SELECT id, user_id, word_id, interval_days, next_review_date, ease_factor,
                    consecutive_correct, consecutive_incorrect, total_reviews,
                    last_review_date, created_at
             FROM reviews WHERE user_id = ?1 AND word_id = ?2",
            params![user_id, word_id],
            Self::row_to_review,
        )
        .optional()
        .map_err(Into::into)
    }
}

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

impl WordRepository for SqliteRepository {
    fn get_word(&self, word_id: i64) -> Result<Option<Word>> {
        self.conn
            .query_row(
                "SELECT word_id, text, pronunciation, translation, example, level
                 FROM words WHERE word_id = ?1",
                params![word_id],
                Self::row_to_word,
            )
            .optional()
            .map_err(Into::into)
    }

    fn get_words_by_level(&self, level: Level, limit: usize) -> Result<Vec<Word>> {
        let mut stmt = self.conn.prepare(
            "SELECT word_id, text, pronunciation, translation, example, level
             FROM words WHERE level = ?1 ORDER BY word_id LIMIT ?2",
        )?;

        let words = stmt
            .query_map(params![level.as_str(), limit], Self::row_to_word)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(words)
    }

    fn add_word(&self, word: &NewWord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO words (text, pronunciation, translation, example, level)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                word.text,
                word.pronunciation,
                word.translation,
                word.example,
                word.level.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

impl UserRepository for SqliteRepository {
    fn get_user(&self, user_id: i64) -> Result<Option<UserProfile>> {
        Self::query_user(&self.conn, user_id)
    }

    fn get_or_create_user(&mut self, user_id: i64, default_level: Level) -> Result<UserProfile> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !Self::user_exists(&tx, user_id)? {
            tx.execute(
                "INSERT INTO users (user_id, level, created_at) VALUES (?1, ?2, ?3)",
                params![user_id, default_level.as_str(), Utc::now().to_rfc3339()],
            )?;
        }

        let profile = Self::query_user(&tx, user_id)?.ok_or_else(|| {
            StoreError::ConstraintViolation(format!("user {user_id} missing after insert"))
        })?;
        tx.commit()?;
        Ok(profile)
    }

    fn set_user_level(&self, user_id: i64, level: Level) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE users SET level = ?1 WHERE user_id = ?2",
            params![level.as_str(), user_id],
        )?;
        if updated == 0 {
            return Err(StoreError::UserNotFound(user_id));
        }
        Ok(())
    }

    fn mark_word_learned(&mut self, user_id: i64, word_id: i64) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !Self::user_exists(&tx, user_id)? {
            return Err(StoreError::UserNotFound(user_id));
        }
        if !Self::word_exists(&tx, word_id)? {
            return Err(StoreError::WordNotFound(word_id));
        }

        // Set membership: re-marking a learned word is a no-op.
        tx.execute(
            "INSERT OR IGNORE INTO learned_words (user_id, word_id) VALUES (?1, ?2)",
            params![user_id, word_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn record_quiz_result(&self, user_id: i64, correct: bool) -> Result<()> {
        let sql = if correct {
            "UPDATE users SET quiz_correct = quiz_correct + 1 WHERE user_id = ?1"
        } else {
            "UPDATE users SET quiz_incorrect = quiz_incorrect + 1 WHERE user_id = ?1"
        };
        let updated = self.conn.execute(sql, params![user_id])?;
        if updated == 0 {
            return Err(StoreError::UserNotFound(user_id));
        }
        Ok(())
    }
}

impl ReviewRepository for SqliteRepository {
    fn get_review(&self, id: i64) -> Result<Option<ReviewRecord>> {
        Self::query_review(&self.conn, id)
    }

    fn get_review_for_pair(&self, user_id: i64, word_id: i64) -> Result<Option<ReviewRecord>> {
        Self::query_review_for_pair(&self.conn, user_id, word_id)
    }

    fn enroll(
        &mut self,
        user_id: i64,
        word_id: i64,
        initial: &ReviewState,
    ) -> Result<ReviewRecord> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !Self::user_exists(&tx, user_id)? {
            return Err(StoreError::UserNotFound(user_id));
        }
        if !Self::word_exists(&tx, word_id)? {
            return Err(StoreError::WordNotFound(word_id));
        }

        // The unique (user_id, word_id) index makes a concurrent duplicate
        // impossible; a losing writer lands on DO NOTHING and reads back
        // the winner's row.
        tx.execute(
            "INSERT INTO reviews (user_id, word_id, interval_days, next_review_date,
                                  ease_factor, consecutive_correct, consecutive_incorrect,
                                  total_reviews, last_review_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (user_id, word_id) DO NOTHING",
            params![
                user_id,
                word_id,
                initial.interval_days,
                format_date(initial.next_review_date),
                initial.ease_factor,
                initial.consecutive_correct,
                initial.consecutive_incorrect,
                initial.total_reviews,
                initial.last_review_date.map(format_date),
                Utc::now().to_rfc3339(),
            ],
        )?;

        let record = Self::query_review_for_pair(&tx, user_id, word_id)?.ok_or_else(|| {
            StoreError::ConstraintViolation(format!(
                "review for user {user_id} word {word_id} missing after insert"
            ))
        })?;
        tx.commit()?;
        Ok(record)
    }

    fn record_outcome(
        &mut self,
        id: i64,
        outcome: Outcome,
        today: NaiveDate,
        algorithm: &dyn SpacedRepetitionAlgorithm,
    ) -> Result<ReviewRecord> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let record = Self::query_review(&tx, id)?.ok_or(StoreError::ReviewNotFound(id))?;
        let result = algorithm.schedule(&record.state, outcome, today);

        tx.execute(
            "UPDATE reviews SET interval_days = ?1, next_review_date = ?2, ease_factor = ?3,
                    consecutive_correct = ?4, consecutive_incorrect = ?5, total_reviews = ?6,
                    last_review_date = ?7
             WHERE id = ?8",
            params![
                result.new_state.interval_days,
                format_date(result.new_state.next_review_date),
                result.new_state.ease_factor,
                result.new_state.consecutive_correct,
                result.new_state.consecutive_incorrect,
                result.new_state.total_reviews,
                result.new_state.last_review_date.map(format_date),
                id,
            ],
        )?;
        tx.commit()?;

        Ok(ReviewRecord {
            state: result.new_state,
            ..record
        })
    }

    fn get_due_reviews(
        &self,
        user_id: i64,
        limit: usize,
        today: NaiveDate,
    ) -> Result<Vec<DueReview>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.id, r.user_id, r.word_id, r.interval_days, r.next_review_date,
                    r.ease_factor, r.consecutive_correct, r.consecutive_incorrect,
                    r.total_reviews, r.last_review_date, r.created_at,
                    w.word_id, w.text, w.pronunciation, w.translation, w.example, w.level
             FROM reviews r
             JOIN words w ON r.word_id = w.word_id
             WHERE r.user_id = ?1 AND r.next_review_date <= ?2
             ORDER BY r.next_review_date ASC, r.id ASC
             LIMIT ?3",
        )?;

        let due = stmt
            .query_map(params![user_id, format_date(today), limit], |row| {
                let review = Self::row_to_review(row)?;
                let word = Word {
                    word_id: row.get(11)?,
                    text: row.get(12)?,
                    pronunciation: row.get(13)?,
                    translation: row.get(14)?,
                    example: row.get(15)?,
                    level: Self::column_to_level(row, 16)?,
                };
                Ok(DueReview { review, word })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(due)
    }

    fn count_due(&self, user_id: i64, today: NaiveDate) -> Result<usize> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM reviews WHERE user_id = ?1 AND next_review_date <= ?2",
                params![user_id, format_date(today)],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

impl StatsRepository for SqliteRepository {
    fn get_review_stats(&self, user_id: i64, today: NaiveDate) -> Result<ReviewStats> {
        let (total, due, avg_ease, total_reviews) = self.conn.query_row(
            "SELECT
                COUNT(*) as total,
                COALESCE(SUM(CASE WHEN next_review_date <= ?2 THEN 1 ELSE 0 END), 0) as due,
                COALESCE(AVG(ease_factor), 0) as avg_ease,
                COALESCE(SUM(total_reviews), 0) as reviews
             FROM reviews WHERE user_id = ?1",
            params![user_id, format_date(today)],
            |row| {
                Ok((
                    row.get::<_, usize>(0)?,
                    row.get::<_, usize>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, u64>(3)?,
                ))
            },
        )?;

        Ok(ReviewStats {
            total_words: total,
            due_today: due,
            avg_ease_factor: (avg_ease * 100.0).round() / 100.0,
            total_reviews,
        })
    }
}
