//! Error types for vocab-core.

use thiserror::Error;

/// Error returned when a difficulty level string is not one of the CEFR
/// levels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown level: {0}")]
pub struct ParseLevelError(pub String);
