//! Commit records and history query options

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single commit as seen by a history query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full object id
    pub hash: String,
    /// Author timestamp; kept across rebases and cherry-picks, unlike committer time
    pub timestamp: DateTime<Utc>,
    /// Summary line of the commit message
    pub message: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Message body after the summary line
    pub body: String,
}

impl Commit {
    /// Build a record from a libgit2 commit
    pub fn from_git(commit: &git2::Commit<'_>) -> Self {
        let author = commit.author();
        let timestamp = Utc
            .timestamp_opt(author.when().seconds(), 0)
            .single()
            .unwrap_or_default();

        Self {
            hash: commit.id().to_string(),
            timestamp,
            message: commit.summary().unwrap_or("").to_string(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            body: commit.body().unwrap_or("").trim_end().to_string(),
        }
    }

    /// Abbreviated hash for display
    pub fn short_hash(&self) -> &str {
        let end = self.hash.len().min(7);
        &self.hash[..end]
    }
}

impl std::fmt::Display for Commit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.short_hash(), self.message)
    }
}

/// Options for a path-limited history query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Maximum number of commits to return
    pub max_count: Option<usize>,
    /// Revision whose ancestry is excluded (`from..to`)
    pub from: Option<String>,
    /// Revision to start from, `HEAD` when unset
    pub to: Option<String>,
    /// Sort purely by commit time instead of topological order
    pub strict_date: bool,
}

impl LogOptions {
    /// Options bounded to the newest `max_count` commits
    pub fn bounded(max_count: usize) -> Self {
        Self {
            max_count: Some(max_count),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash() {
        let commit = Commit {
            hash: "0123456789abcdef".to_string(),
            timestamp: Utc::now(),
            message: "Update logic".to_string(),
            author_name: "Test".to_string(),
            author_email: "test@example.com".to_string(),
            body: String::new(),
        };

        assert_eq!(commit.short_hash(), "0123456");
        assert_eq!(commit.to_string(), "0123456 Update logic");
    }

    #[test]
    fn test_bounded_options() {
        let options = LogOptions::bounded(20);
        assert_eq!(options.max_count, Some(20));
        assert!(options.from.is_none());
        assert!(!options.strict_date);
    }
}
