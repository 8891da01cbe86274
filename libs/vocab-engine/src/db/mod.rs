//! SQLite review store.

pub mod dates;
pub mod error;
pub mod repository;
pub mod schema;

pub use error::StoreError;
pub use repository::{
    NewWord, ReviewRepository, SqliteRepository, StatsRepository, UserRepository, WordRepository,
};
