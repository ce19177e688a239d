//! Most recent meaningful change to a path

use crate::error::DriftError;
use crate::repo::{Commit, CommitFilter, HistoryProvider, LogOptions};
use std::path::Path;

/// Resolves the effective update of a path: the newest commit in a bounded
/// history window whose message matches no ignore pattern
pub struct EffectiveUpdateResolver<'a> {
    history: &'a dyn HistoryProvider,
    filter: CommitFilter,
    max_history: usize,
}

impl<'a> EffectiveUpdateResolver<'a> {
    pub fn new(history: &'a dyn HistoryProvider, filter: CommitFilter, max_history: usize) -> Self {
        Self {
            history,
            filter,
            max_history,
        }
    }

    /// `Ok(None)` when no meaningful commit exists in the window
    pub fn resolve(&self, path: &Path) -> Result<Option<Commit>, DriftError> {
        let commits = self
            .history
            .file_history(path, &LogOptions::bounded(self.max_history))?;

        let update = self.filter.filter(commits).into_iter().next();

        match &update {
            Some(commit) => tracing::debug!("{:?}: effective update {}", path, commit),
            None => tracing::debug!("{:?}: no meaningful commit in window", path),
        }

        Ok(update)
    }
}
