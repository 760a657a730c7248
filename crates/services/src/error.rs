//! Shared error types for the services crate.

use thiserror::Error;

use prep_core::model::{CardId, ChapterError};
use storage::sqlite::SqliteInitError;

/// Errors emitted by the question bank loader.
///
/// Either variant leaves the pool empty; downstream code treats an empty
/// bank as a valid, non-fatal state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("question bank not found: {path}")]
    NotFound { path: String },

    #[error("malformed question bank: {reason}")]
    Malformed { reason: String },
}

/// Errors emitted by `ProgressService`.
///
/// These signal a caller bug (stale index or id), not a recoverable runtime
/// condition; tests assert against them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("chapter index {index} out of range ({len} chapters)")]
    ChapterOutOfRange { index: usize, len: usize },

    #[error("card not found: {0}")]
    CardNotFound(CardId),

    #[error(transparent)]
    Chapter(ChapterError),
}

impl From<ChapterError> for ProgressError {
    fn from(err: ChapterError) -> Self {
        match err {
            ChapterError::CardNotFound(id) => Self::CardNotFound(id),
            other => Self::Chapter(other),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
