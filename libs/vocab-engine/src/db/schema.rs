//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the review store.
pub const SCHEMA: &str = r#"
-- Learner profiles
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    level TEXT NOT NULL DEFAULT 'A1',
    quiz_correct INTEGER NOT NULL DEFAULT 0,
    quiz_incorrect INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Word catalog
CREATE TABLE IF NOT EXISTS words (
    word_id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    pronunciation TEXT NOT NULL,
    translation TEXT NOT NULL,
    example TEXT NOT NULL,
    level TEXT NOT NULL
);

-- Learned-word membership, one row per (user, word)
CREATE TABLE IF NOT EXISTS learned_words (
    user_id INTEGER NOT NULL REFERENCES users(user_id),
    word_id INTEGER NOT NULL REFERENCES words(word_id),
    PRIMARY KEY (user_id, word_id)
);

-- Per-user-per-word review records
CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id),
    word_id INTEGER NOT NULL REFERENCES words(word_id),
    interval_days INTEGER NOT NULL DEFAULT 1,
    next_review_date TEXT NOT NULL,
    ease_factor REAL NOT NULL DEFAULT 2.5,
    consecutive_correct INTEGER NOT NULL DEFAULT 0,
    consecutive_incorrect INTEGER NOT NULL DEFAULT 0,
    total_reviews INTEGER NOT NULL DEFAULT 0,
    last_review_date TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, word_id)
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_words_level ON words(level);
CREATE INDEX IF NOT EXISTS idx_reviews_user_due ON reviews(user_id, next_review_date);
"#;

/// Record the schema version if not present.
pub const INIT_SCHEMA_VERSION: &str = r#"
INSERT OR IGNORE INTO schema_version (version) VALUES (1);
"#;
