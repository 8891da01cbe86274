//! Enrollment and user profile tests.

mod common;

use common::{day, engine_with_catalog, USER_ID};
use pretty_assertions::assert_eq;
use vocab_core::{Level, Outcome};
use vocab_engine::StoreError;

#[test]
fn enroll_creates_record_due_immediately() {
    let (engine, word_ids) = engine_with_catalog(&["apple"]);

    let record = engine.enroll(USER_ID, word_ids[0], day(0)).unwrap();

    assert_eq!(record.user_id, USER_ID);
    assert_eq!(record.word_id, word_ids[0]);
    assert_eq!(record.state.interval_days, 1);
    assert_eq!(record.state.ease_factor, 2.5);
    assert_eq!(record.state.total_reviews, 0);
    assert_eq!(record.state.next_review_date, day(0));
    assert_eq!(record.state.last_review_date, None);
}

#[test]
fn enroll_is_idempotent() {
    let (engine, word_ids) = engine_with_catalog(&["apple"]);

    let first = engine.enroll(USER_ID, word_ids[0], day(0)).unwrap();
    engine
        .record_outcome(first.id, Outcome::Correct, day(0))
        .unwrap();

    // Re-enrolling later returns the reviewed record unchanged.
    let second = engine.enroll(USER_ID, word_ids[0], day(5)).unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.state.total_reviews, 1);
    assert_eq!(second.state.consecutive_correct, 1);
    assert_eq!(second.state.next_review_date, day(1));
}

#[test]
fn enroll_rejects_unknown_user() {
    let (engine, word_ids) = engine_with_catalog(&["apple"]);

    let err = engine.enroll(9999, word_ids[0], day(0)).unwrap_err();
    assert!(matches!(err, StoreError::UserNotFound(9999)));
    assert!(!err.is_retryable());
}

#[test]
fn enroll_rejects_unknown_word() {
    let (engine, _) = engine_with_catalog(&["apple"]);

    let err = engine.enroll(USER_ID, 9999, day(0)).unwrap_err();
    assert!(matches!(err, StoreError::WordNotFound(9999)));
}

#[test]
fn get_or_create_user_returns_existing_profile() {
    let (engine, _) = engine_with_catalog(&[]);

    let profile = engine.get_or_create_user(USER_ID, Level::B2).unwrap();
    // Seeded at A1; the default level applies only on first contact.
    assert_eq!(profile.level, Level::A1);

    let fresh = engine.get_or_create_user(42, Level::B2).unwrap();
    assert_eq!(fresh.user_id, 42);
    assert_eq!(fresh.level, Level::B2);
    assert_eq!(fresh.quiz_correct, 0);
    assert_eq!(fresh.words_learned, Vec::<i64>::new());
}

#[test]
fn set_user_level_updates_profile() {
    let (engine, _) = engine_with_catalog(&[]);

    engine.set_user_level(USER_ID, Level::C1).unwrap();
    let profile = engine.get_or_create_user(USER_ID, Level::A1).unwrap();
    assert_eq!(profile.level, Level::C1);

    let err = engine.set_user_level(9999, Level::A2).unwrap_err();
    assert!(matches!(err, StoreError::UserNotFound(9999)));
}

#[test]
fn learned_words_form_a_set() {
    let (engine, word_ids) = engine_with_catalog(&["apple", "bread"]);

    engine.mark_word_learned(USER_ID, word_ids[0]).unwrap();
    engine.mark_word_learned(USER_ID, word_ids[1]).unwrap();
    engine.mark_word_learned(USER_ID, word_ids[0]).unwrap();

    let profile = engine.get_or_create_user(USER_ID, Level::A1).unwrap();
    assert_eq!(profile.words_learned, word_ids);

    let err = engine.mark_word_learned(USER_ID, 9999).unwrap_err();
    assert!(matches!(err, StoreError::WordNotFound(9999)));
}

#[test]
fn quiz_tallies_accumulate_independently_of_reviews() {
    let (engine, _) = engine_with_catalog(&[]);

    engine.record_quiz_result(USER_ID, true).unwrap();
    engine.record_quiz_result(USER_ID, true).unwrap();
    engine.record_quiz_result(USER_ID, false).unwrap();

    let profile = engine.get_or_create_user(USER_ID, Level::A1).unwrap();
    assert_eq!(profile.quiz_correct, 2);
    assert_eq!(profile.quiz_incorrect, 1);

    // No review records were created along the way.
    let stats = engine.stats(USER_ID, day(0)).unwrap();
    assert_eq!(stats.total_words, 0);
}

#[test]
fn catalog_lookup_errors_on_missing_word() {
    let (engine, word_ids) = engine_with_catalog(&["apple"]);

    let word = engine.lookup_word(word_ids[0]).unwrap();
    assert_eq!(word.text, "apple");
    assert_eq!(word.level, Level::A1);

    let err = engine.lookup_word(9999).unwrap_err();
    assert!(matches!(err, StoreError::WordNotFound(9999)));
}

#[test]
fn words_by_level_respects_limit_and_order() {
    let (engine, word_ids) = engine_with_catalog(&["apple", "bread", "chair"]);

    let words = engine.words_by_level(Level::A1, 2).unwrap();
    assert_eq!(
        words.iter().map(|w| w.word_id).collect::<Vec<_>>(),
        word_ids[..2].to_vec()
    );

    assert!(engine.words_by_level(Level::C2, 10).unwrap().is_empty());
}
