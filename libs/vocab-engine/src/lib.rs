//! Vocabulary review engine: a durable SQLite review store plus the public
//! scheduling operations built on [`vocab_core`].
//!
//! Each public [`Engine`] operation is a single transaction against the
//! store; "today" is always caller-supplied so nothing here reads the wall
//! clock. The presentation layer (a chat bot in the original deployment)
//! sits entirely outside this crate.

pub mod db;
pub mod engine;

pub use db::{
    NewWord, ReviewRepository, SqliteRepository, StatsRepository, StoreError, UserRepository,
    WordRepository,
};
pub use engine::Engine;
