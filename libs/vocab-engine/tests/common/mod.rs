//! Shared fixtures for engine integration tests.

use chrono::{Duration, NaiveDate};
use vocab_core::Level;
use vocab_engine::{Engine, NewWord, SqliteRepository, UserRepository, WordRepository};

pub const USER_ID: i64 = 1001;

/// Fixed base date so tests never touch the wall clock.
pub fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Duration::days(i64::from(offset))
}

/// Catalog entry factory.
pub fn sample_word(text: &str, level: Level) -> NewWord {
    NewWord {
        text: text.to_string(),
        pronunciation: format!("[{text}]"),
        translation: format!("{text} (translated)"),
        example: format!("I saw the {text}."),
        level,
    }
}

/// Engine over an in-memory store with one user and `words` seeded A1
/// catalog entries. Returns the engine and the word ids in catalog order.
pub fn engine_with_catalog(words: &[&str]) -> (Engine, Vec<i64>) {
    let mut repo = SqliteRepository::open_in_memory().expect("open in-memory store");
    let word_ids = words
        .iter()
        .map(|text| repo.add_word(&sample_word(text, Level::A1)).expect("seed word"))
        .collect();
    repo.get_or_create_user(USER_ID, Level::A1).expect("seed user");
    (Engine::with_repository(repo), word_ids)
}
