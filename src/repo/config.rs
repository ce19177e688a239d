//! Project configuration for DocGap

use super::{clean_path, CommitFilter};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up at the repository root
pub const CONFIG_FILE: &str = ".docgap.toml";

/// Configuration for a repository being checked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Git history settings
    #[serde(default)]
    pub git: GitConfig,

    /// Coverage settings
    #[serde(default)]
    pub coverage: CoverageConfig,

    /// Doc to source pairings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

/// Git history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Regular expressions matched against commit messages; matching commits are noise
    #[serde(default, alias = "ignoreCommitPatterns")]
    pub ignore_commit_patterns: Vec<String>,

    /// Number of commits per path considered when resolving the last update
    #[serde(default = "default_max_history", alias = "maxHistory")]
    pub max_history: usize,
}

/// Coverage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Minimum average coverage for `docgap coverage` to succeed
    #[serde(default, alias = "minScore", skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
}

/// One documentation file and the sources it describes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Documentation path, relative to the repository root
    pub doc: PathBuf,
    /// Source path(s); entries may be glob patterns
    pub source: SourceSpec,
}

/// A single source path or a list of them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    One(String),
    Many(Vec<String>),
}

impl SourceSpec {
    /// All entries, in declaration order
    pub fn entries(&self) -> Vec<&str> {
        match self {
            SourceSpec::One(s) => vec![s.as_str()],
            SourceSpec::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// A rule with globs expanded into concrete root-relative paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRule {
    pub doc: PathBuf,
    pub sources: Vec<PathBuf>,
}

impl ResolvedRule {
    pub fn new<D: Into<PathBuf>, S: Into<PathBuf>>(doc: D, sources: Vec<S>) -> Self {
        Self {
            doc: doc.into(),
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_max_history() -> usize {
    20
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            ignore_commit_patterns: Vec::new(),
            max_history: default_max_history(),
        }
    }
}

impl RepoConfig {
    /// Load configuration from the repository or return defaults
    pub fn load_or_default(repo_root: &Path) -> Result<Self> {
        let config_path = repo_root.join(CONFIG_FILE);

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, repo_root);
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from an explicit path
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: RepoConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the repository
    pub fn save(&self, repo_root: &Path) -> Result<PathBuf> {
        let config_path = repo_root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(config_path)
    }

    /// Check the invariants the rest of the tool relies on
    pub fn validate(&self) -> Result<()> {
        if self.git.max_history == 0 {
            anyhow::bail!("git.max_history must be at least 1");
        }

        if let Some(min) = self.coverage.min_score {
            if !(0.0..=1.0).contains(&min) {
                anyhow::bail!("coverage.min_score must be between 0 and 1, got {}", min);
            }
        }

        self.commit_filter()?;

        for (i, rule) in self.rules.iter().enumerate() {
            if rule.doc.as_os_str().is_empty() {
                anyhow::bail!("rules[{}]: doc must not be empty", i);
            }
            let entries = rule.source.entries();
            if entries.is_empty() || entries.iter().any(|s| s.trim().is_empty()) {
                anyhow::bail!("rules[{}] ({:?}): source must name at least one path", i, rule.doc);
            }
        }

        Ok(())
    }

    /// Compile the commit ignore patterns
    pub fn commit_filter(&self) -> Result<CommitFilter> {
        CommitFilter::new(&self.git.ignore_commit_patterns)
            .context("Invalid git.ignore_commit_patterns")
    }

    /// Expand globs and produce concrete rules relative to `repo_root`
    pub fn resolve_rules(&self, repo_root: &Path) -> Result<Vec<ResolvedRule>> {
        self.rules
            .iter()
            .map(|rule| {
                let mut sources: Vec<PathBuf> = Vec::new();
                for entry in rule.source.entries() {
                    for path in expand_source(repo_root, entry)? {
                        if !sources.contains(&path) {
                            sources.push(path);
                        }
                    }
                }
                Ok(ResolvedRule {
                    doc: clean_path(&rule.doc),
                    sources,
                })
            })
            .collect()
    }
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

fn expand_source(repo_root: &Path, entry: &str) -> Result<Vec<PathBuf>> {
    if !is_glob(entry) {
        return Ok(vec![clean_path(Path::new(entry))]);
    }

    let pattern = repo_root.join(clean_path(Path::new(entry)));
    let pattern = pattern
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Source pattern is not valid UTF-8: {:?}", pattern))?;

    let mut matches = Vec::new();
    for path in glob::glob(pattern).with_context(|| format!("Invalid source glob: {}", entry))? {
        let path = path.with_context(|| format!("Failed to expand source glob: {}", entry))?;
        if path.is_file() {
            let relative = path.strip_prefix(repo_root).unwrap_or(&path);
            matches.push(clean_path(relative));
        }
    }

    if matches.is_empty() {
        tracing::warn!("Source glob {} matched no files", entry);
    }

    Ok(matches)
}
