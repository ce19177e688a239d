//! Removal of noise commits from a history list
//!
//! A commit is meaningful when its message matches none of the configured
//! ignore patterns.

use super::Commit;
use crate::error::DriftError;
use regex::RegexSet;

/// Compiled set of commit ignore patterns
#[derive(Debug, Clone)]
pub struct CommitFilter {
    patterns: Option<RegexSet>,
}

impl CommitFilter {
    /// Compile the given patterns once
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, DriftError> {
        if patterns.is_empty() {
            return Ok(Self::none());
        }

        let set = RegexSet::new(patterns.iter().map(|p| p.as_ref()))?;
        Ok(Self {
            patterns: Some(set),
        })
    }

    /// A filter that keeps every commit
    pub fn none() -> Self {
        Self { patterns: None }
    }

    /// Whether a commit message matches any ignore pattern
    pub fn is_ignored(&self, message: &str) -> bool {
        self.patterns
            .as_ref()
            .is_some_and(|set| set.is_match(message))
    }

    /// Keep the commits whose message matches no pattern, preserving order
    pub fn filter(&self, commits: Vec<Commit>) -> Vec<Commit> {
        if self.patterns.is_none() {
            return commits;
        }

        commits
            .into_iter()
            .filter(|commit| !self.is_ignored(&commit.message))
            .collect()
    }
}

impl Default for CommitFilter {
    fn default() -> Self {
        Self::none()
    }
}

/// Filter `commits` against `ignore_patterns` in one call
pub fn filter_meaningful<S: AsRef<str>>(
    commits: Vec<Commit>,
    ignore_patterns: &[S],
) -> Result<Vec<Commit>, DriftError> {
    Ok(CommitFilter::new(ignore_patterns)?.filter(commits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn commit(hash: &str, message: &str) -> Commit {
        Commit {
            hash: hash.to_string(),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            message: message.to_string(),
            author_name: "Test".to_string(),
            author_email: "test@example.com".to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn test_empty_patterns_is_identity() {
        let commits = vec![commit("a", "style: fmt"), commit("b", "feat: api")];
        let filtered = filter_meaningful(commits.clone(), &[] as &[&str]).unwrap();
        assert_eq!(filtered, commits);
    }

    #[test]
    fn test_any_pattern_excludes() {
        let commits = vec![
            commit("a", "style: reformat"),
            commit("b", "feat: add parser"),
            commit("c", "chore(ci): bump runner"),
            commit("d", "fix typo in docs"),
        ];

        let filtered =
            filter_meaningful(commits, &["^style", "^chore\\(ci\\)", "typo"]).unwrap();

        let hashes: Vec<_> = filtered.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["b"]);
    }

    #[test]
    fn test_order_preserved() {
        let commits = vec![
            commit("a", "one"),
            commit("b", "skip me"),
            commit("c", "two"),
            commit("d", "three"),
        ];

        let filtered = filter_meaningful(commits, &["skip"]).unwrap();
        let hashes: Vec<_> = filtered.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = CommitFilter::new(&["(unclosed"]);
        assert!(matches!(result, Err(DriftError::InvalidPattern(_))));
    }

    proptest! {
        #[test]
        fn filter_keeps_exactly_unmatched(
            messages in proptest::collection::vec("[a-z]{1,6}( [a-z]{1,6}){0,3}", 0..12),
            words in proptest::collection::vec("[a-z]{1,3}", 1..4),
        ) {
            let commits: Vec<Commit> = messages
                .iter()
                .enumerate()
                .map(|(i, m)| commit(&i.to_string(), m))
                .collect();
            let patterns: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();

            let filtered = filter_meaningful(commits.clone(), &patterns).unwrap();

            let expected: Vec<Commit> = commits
                .into_iter()
                .filter(|c| !words.iter().any(|w| c.message.contains(w.as_str())))
                .collect();
            prop_assert_eq!(filtered, expected);
        }
    }
}
