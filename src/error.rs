//! Failure taxonomy for history and content lookups
//!
//! Only [`DriftError::NotAVersionControlRoot`] is fatal for a run. The other
//! variants are local to one path and the classifier degrades them to
//! "no signal" instead of aborting.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the history, content and filtering layers
#[derive(Debug, Error)]
pub enum DriftError {
    /// The working directory is not inside a git repository
    #[error("{0:?} is not inside a git repository")]
    NotAVersionControlRoot(PathBuf),

    /// History lookup for one path failed
    #[error("failed to query commit history for {path:?}")]
    HistoryQueryFailed {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// Reading a path as of a historical commit failed
    #[error("failed to read {path:?} at commit {commit}")]
    ContentFetchFailed {
        path: PathBuf,
        commit: String,
        #[source]
        source: git2::Error,
    },

    /// Reading a path from the working tree failed
    #[error("failed to read {path:?}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An ignore pattern is not a valid regular expression
    #[error("invalid commit ignore pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl DriftError {
    /// Whether this error should stop the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, DriftError::NotAVersionControlRoot(_))
    }
}
