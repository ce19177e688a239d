//! Drift classification engine
//!
//! This module decides whether a documentation file is still current by:
//! - Resolving the last meaningful commit of the doc and each paired source
//! - Escalating sources committed after the doc to a content signature check
//! - Aggregating per-source outcomes into one verdict per rule

mod detector;
mod resolver;
pub mod signature;

pub use detector::{DetectorConfig, DriftDetector};
pub use resolver::EffectiveUpdateResolver;
pub use signature::{normalize, sign, ContentSignature};

use crate::repo::Commit;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verdict for one doc/source rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftStatus {
    /// No source changed meaningfully after the doc
    Fresh,
    /// A source was committed after the doc but normalizes to the same content
    StaleTimestamp,
    /// A source's content changed since the doc was last updated
    StaleSemantic,
    /// The doc has no meaningful history
    Unknown,
}

impl DriftStatus {
    /// Precedence among resolved verdicts; `Unknown` never competes
    fn rank(self) -> u8 {
        match self {
            DriftStatus::Unknown | DriftStatus::Fresh => 0,
            DriftStatus::StaleTimestamp => 1,
            DriftStatus::StaleSemantic => 2,
        }
    }

    /// Whether this verdict reports drift
    pub fn is_stale(self) -> bool {
        matches!(self, DriftStatus::StaleTimestamp | DriftStatus::StaleSemantic)
    }

    /// The more severe of two verdicts
    pub fn escalate(self, other: DriftStatus) -> DriftStatus {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

impl std::fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriftStatus::Fresh => write!(f, "FRESH"),
            DriftStatus::StaleTimestamp => write!(f, "STALE_TIMESTAMP"),
            DriftStatus::StaleSemantic => write!(f, "STALE_SEMANTIC"),
            DriftStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A source file that triggered a stale verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftingSource {
    /// Source path, relative to the repository root
    pub source_file: PathBuf,
    /// Contribution of this source (`StaleTimestamp` or `StaleSemantic`)
    pub status: DriftStatus,
    /// Human-readable explanation
    pub reason: String,
    /// Last meaningful commit of the source
    pub last_commit: Commit,
}

/// Classification result for one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftVerdict {
    /// Documentation path
    pub doc_path: PathBuf,
    /// Every source evaluated for this doc
    pub source_files: Vec<PathBuf>,
    /// Aggregated verdict
    pub status: DriftStatus,
    /// Last meaningful commit of the doc
    pub last_doc_commit: Option<Commit>,
    /// Sources that contributed a stale outcome
    pub drifting_sources: Vec<DriftingSource>,
}

impl DriftVerdict {
    /// Whether `source` is among the drifting sources
    pub fn is_drifting(&self, source: &std::path::Path) -> bool {
        self.drifting_sources.iter().any(|d| d.source_file == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_order() {
        use DriftStatus::*;

        assert_eq!(Fresh.escalate(StaleTimestamp), StaleTimestamp);
        assert_eq!(StaleTimestamp.escalate(Fresh), StaleTimestamp);
        assert_eq!(StaleTimestamp.escalate(StaleSemantic), StaleSemantic);
        assert_eq!(StaleSemantic.escalate(StaleTimestamp), StaleSemantic);
        assert_eq!(Fresh.escalate(Fresh), Fresh);
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&DriftStatus::StaleSemantic).unwrap();
        assert_eq!(json, "\"STALE_SEMANTIC\"");
        assert_eq!(DriftStatus::StaleTimestamp.to_string(), "STALE_TIMESTAMP");
        assert!(!DriftStatus::Unknown.is_stale());
    }
}
