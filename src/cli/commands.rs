//! Command implementations

use crate::coverage::{analyze_coverage, average_score, CoverageReport};
use crate::drift::{DetectorConfig, DriftDetector, DriftStatus, DriftVerdict};
use crate::repo::{RepoConfig, Repository, ResolvedRule, CONFIG_FILE};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// An opened repository with its configuration and expanded rules
pub struct Project {
    pub repo: Repository,
    pub config: RepoConfig,
    pub rules: Vec<ResolvedRule>,
}

impl Project {
    /// Open the repository containing `path` and load its configuration
    pub fn open(path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open Git repository at {:?}", path))?;

        let config = match config_path {
            Some(p) => RepoConfig::load(p)?,
            None => RepoConfig::load_or_default(repo.root())?,
        };

        let rules = config.resolve_rules(repo.root())?;
        tracing::debug!("Loaded {} rule(s)", rules.len());

        Ok(Self { repo, config, rules })
    }

    /// Every doc and source path named by a rule, relative to the root
    pub fn watched_paths(&self) -> HashSet<PathBuf> {
        self.rules
            .iter()
            .flat_map(|rule| std::iter::once(&rule.doc).chain(rule.sources.iter()))
            .cloned()
            .collect()
    }
}

/// Whether a filesystem event at `path` should re-run the check
///
/// Rule docs and sources trigger directly. Inside `.git`, only the refs a
/// commit, checkout or reset moves are considered.
pub fn triggers_check(root: &Path, watched: &HashSet<PathBuf>, path: &Path) -> bool {
    let relative = crate::repo::clean_path(path.strip_prefix(root).unwrap_or(path));

    match relative.strip_prefix(".git") {
        Ok(git_path) => {
            git_path == Path::new("HEAD")
                || git_path == Path::new("logs/HEAD")
                || git_path.starts_with("refs")
        }
        Err(_) => watched.contains(&relative),
    }
}

/// Coverage of one rule's sources against its doc
#[derive(Debug, Clone, Serialize)]
pub struct RuleCoverage {
    pub doc: PathBuf,
    pub reports: Vec<CoverageReport>,
}

/// Result of a `check` run
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub results: Vec<DriftVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Vec<RuleCoverage>>,
}

impl CheckOutcome {
    /// Number of rules with a stale verdict
    pub fn stale_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_stale()).count()
    }

    /// Whether the run should fail
    pub fn is_failure(&self, strict: bool) -> bool {
        self.results.iter().any(|r| {
            r.status.is_stale() || (strict && r.status == DriftStatus::Unknown)
        })
    }
}

/// Classify every configured rule
pub fn check(project: &Project, with_coverage: bool) -> Result<CheckOutcome> {
    let config = DetectorConfig::from_repo_config(&project.config)?;
    let detector = DriftDetector::with_config(&project.repo, &project.repo, config);

    let results = detector
        .classify(&project.rules)
        .context("Drift analysis failed")?;

    let coverage = with_coverage.then(|| coverage(project));

    Ok(CheckOutcome { results, coverage })
}

/// Score each rule's sources against its doc; rules whose doc cannot be read are skipped
pub fn coverage(project: &Project) -> Vec<RuleCoverage> {
    let root = project.repo.root();

    project
        .rules
        .iter()
        .filter_map(|rule| {
            let doc_path = root.join(&rule.doc);
            let doc_text = match std::fs::read_to_string(&doc_path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Skipping coverage for {:?}: {}", rule.doc, e);
                    return None;
                }
            };

            let sources: Vec<PathBuf> = rule.sources.iter().map(|s| root.join(s)).collect();
            let mut reports = analyze_coverage(&sources, &doc_text);
            for report in &mut reports {
                report.file = project.repo.relative_path(&report.file);
            }

            Some(RuleCoverage {
                doc: rule.doc.clone(),
                reports,
            })
        })
        .collect()
}

/// Whether coverage meets the configured minimum
pub fn coverage_passes(config: &RepoConfig, coverage: &[RuleCoverage]) -> bool {
    let Some(min) = config.coverage.min_score else {
        return true;
    };

    let reports: Vec<CoverageReport> = coverage
        .iter()
        .flat_map(|c| c.reports.iter().cloned())
        .collect();

    average_score(&reports).map_or(true, |avg| avg >= min)
}

/// Write a default configuration file
pub fn init(path: &Path, force: bool) -> Result<PathBuf> {
    let repo = Repository::open(path)
        .with_context(|| format!("Failed to open Git repository at {:?}", path))?;

    let config_path = repo.root().join(CONFIG_FILE);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    RepoConfig::default().save(repo.root())
}
