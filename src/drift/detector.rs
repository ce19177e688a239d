//! Main drift classification engine
//!
//! Coordinates the per-rule decision:
//! - Effective update of the doc and of each source
//! - Signature comparison for sources newer than the doc
//! - Aggregation into a single verdict

use super::{sign, DriftStatus, DriftVerdict, DriftingSource, EffectiveUpdateResolver};
use crate::error::DriftError;
use crate::repo::{Commit, CommitFilter, ContentSource, HistoryProvider, RepoConfig, ResolvedRule};
use rayon::prelude::*;
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};

/// Configuration for drift classification
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// History window per path
    pub max_history: usize,
    /// Commits excluded from "meaningful" history
    pub filter: CommitFilter,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_history: 20,
            filter: CommitFilter::none(),
        }
    }
}

impl DetectorConfig {
    /// Build from the `[git]` section of a project config
    pub fn from_repo_config(config: &RepoConfig) -> anyhow::Result<Self> {
        Ok(Self {
            max_history: config.git.max_history,
            filter: config.commit_filter()?,
        })
    }
}

/// Outcome of evaluating one source against the doc's effective update
#[derive(Debug)]
enum SourceOutcome {
    /// No meaningful commit in the source's window
    NoHistory,
    /// Source was not committed after the doc
    NotNewer,
    /// A lookup failed; the source contributes nothing
    NoSignal,
    /// Newer commit, identical normalized content
    Cosmetic(Commit),
    /// Newer commit, different normalized content
    Semantic { commit: Commit, reason: String },
}

/// Main drift classification engine
pub struct DriftDetector<'a> {
    resolver: EffectiveUpdateResolver<'a>,
    content: &'a dyn ContentSource,
}

impl<'a> DriftDetector<'a> {
    /// Create a detector with default configuration
    pub fn new(history: &'a dyn HistoryProvider, content: &'a dyn ContentSource) -> Self {
        Self::with_config(history, content, DetectorConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(
        history: &'a dyn HistoryProvider,
        content: &'a dyn ContentSource,
        config: DetectorConfig,
    ) -> Self {
        Self {
            resolver: EffectiveUpdateResolver::new(history, config.filter, config.max_history),
            content,
        }
    }

    /// Classify every rule, one verdict per rule in input order
    ///
    /// Only a missing repository aborts; every other failure degrades the
    /// affected rule or source.
    pub fn classify(&self, rules: &[ResolvedRule]) -> Result<Vec<DriftVerdict>, DriftError> {
        rules.par_iter().map(|rule| self.classify_rule(rule)).collect()
    }

    /// Classify a single rule
    pub fn classify_rule(&self, rule: &ResolvedRule) -> Result<DriftVerdict, DriftError> {
        let doc_update = match self.resolver.resolve(&rule.doc) {
            Ok(Some(commit)) => commit,
            Ok(None) => return Ok(unknown(rule)),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("No history for doc {:?}: {}", rule.doc, e);
                return Ok(unknown(rule));
            }
        };

        let outcomes = rule
            .sources
            .par_iter()
            .map(|source| {
                self.classify_source(source, &doc_update)
                    .map(|outcome| (source.clone(), outcome))
            })
            .collect::<Result<Vec<(PathBuf, SourceOutcome)>, DriftError>>()?;

        let mut status = DriftStatus::Fresh;
        let mut drifting_sources = Vec::new();

        for (source_file, outcome) in outcomes {
            let (contribution, last_commit, reason) = match outcome {
                SourceOutcome::Cosmetic(commit) => {
                    let reason = format!(
                        "Updated in {} after the doc, but only whitespace changed",
                        describe(&commit)
                    );
                    (DriftStatus::StaleTimestamp, commit, reason)
                }
                SourceOutcome::Semantic { commit, reason } => {
                    (DriftStatus::StaleSemantic, commit, reason)
                }
                SourceOutcome::NoHistory | SourceOutcome::NotNewer | SourceOutcome::NoSignal => {
                    continue;
                }
            };

            status = status.escalate(contribution);
            drifting_sources.push(DriftingSource {
                source_file,
                status: contribution,
                reason,
                last_commit,
            });
        }

        tracing::debug!("{:?}: {}", rule.doc, status);

        Ok(DriftVerdict {
            doc_path: rule.doc.clone(),
            source_files: rule.sources.clone(),
            status,
            last_doc_commit: Some(doc_update),
            drifting_sources,
        })
    }

    fn classify_source(&self, source: &Path, doc_update: &Commit) -> Result<SourceOutcome, DriftError> {
        let source_update = match self.resolver.resolve(source) {
            Ok(Some(commit)) => commit,
            Ok(None) => return Ok(SourceOutcome::NoHistory),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("Skipping source {:?}: {}", source, e);
                return Ok(SourceOutcome::NoSignal);
            }
        };

        if source_update.timestamp <= doc_update.timestamp {
            return Ok(SourceOutcome::NotNewer);
        }

        let baseline = match self.content.content_at_commit(source, &doc_update.hash) {
            Ok(content) => content,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("Treating {:?} as having no baseline: {}", source, e);
                None
            }
        };

        let current = match self.content.current_content(source) {
            Ok(content) => content,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("Skipping source {:?}: {}", source, e);
                return Ok(SourceOutcome::NoSignal);
            }
        };

        if sign(baseline.as_deref().unwrap_or("")) == sign(&current) {
            return Ok(SourceOutcome::Cosmetic(source_update));
        }

        let reason = semantic_reason(baseline.as_deref(), &current, doc_update, &source_update);
        Ok(SourceOutcome::Semantic {
            commit: source_update,
            reason,
        })
    }
}

fn unknown(rule: &ResolvedRule) -> DriftVerdict {
    DriftVerdict {
        doc_path: rule.doc.clone(),
        source_files: rule.sources.clone(),
        status: DriftStatus::Unknown,
        last_doc_commit: None,
        drifting_sources: Vec::new(),
    }
}

fn describe(commit: &Commit) -> String {
    format!("{} \"{}\"", commit.short_hash(), commit.message)
}

fn semantic_reason(
    baseline: Option<&str>,
    current: &str,
    doc_update: &Commit,
    source_update: &Commit,
) -> String {
    let Some(baseline) = baseline else {
        return format!(
            "No content at doc commit {}; last changed in {}",
            doc_update.short_hash(),
            describe(source_update)
        );
    };

    let (mut added, mut removed) = (0usize, 0usize);
    for change in TextDiff::from_lines(baseline, current).iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }

    format!(
        "Content changed since doc commit {} (+{} -{} lines); last changed in {}",
        doc_update.short_hash(),
        added,
        removed,
        describe(source_update)
    )
}
