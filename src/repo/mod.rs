//! Repository access: history queries and file content
//!
//! This module handles Git repository operations including:
//! - Repository discovery and root resolution
//! - Path-limited commit history
//! - File content at a commit and in the working tree

mod commit;
mod config;
mod filter;

pub use commit::{Commit, LogOptions};
pub use config::{
    CoverageConfig, GitConfig, RepoConfig, ResolvedRule, RuleConfig, SourceSpec, CONFIG_FILE,
};
pub use filter::{filter_meaningful, CommitFilter};

use crate::error::DriftError;
use git2::{ErrorCode, Oid, Repository as GitRepo, Sort, Tree};
use std::path::{Component, Path, PathBuf};

/// Source of path-limited commit history
pub trait HistoryProvider: Send + Sync {
    /// Commits touching `path`, newest first, bounded by `options.max_count`
    fn file_history(&self, path: &Path, options: &LogOptions) -> Result<Vec<Commit>, DriftError>;
}

/// Source of file content, historical and current
pub trait ContentSource: Send + Sync {
    /// Content of `path` as committed at `commit`, `None` if it did not exist there
    fn content_at_commit(&self, path: &Path, commit: &str) -> Result<Option<String>, DriftError>;

    /// Content of `path` in the working tree
    fn current_content(&self, path: &Path) -> Result<String, DriftError>;
}

/// A Git repository being checked
///
/// Only the working directory is held; each query opens its own libgit2
/// handle so the repository can be shared across worker threads.
#[derive(Debug, Clone)]
pub struct Repository {
    /// Path to the repository root
    root: PathBuf,
}

impl Repository {
    /// Discover the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DriftError> {
        let path = path.as_ref();
        let repo = GitRepo::discover(path)
            .map_err(|_| DriftError::NotAVersionControlRoot(path.to_path_buf()))?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| DriftError::NotAVersionControlRoot(path.to_path_buf()))?;
        let root = std::fs::canonicalize(workdir).unwrap_or_else(|_| workdir.to_path_buf());

        tracing::debug!("Opened repository at {:?}", root);

        Ok(Self { root })
    }

    /// Get the repository root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current HEAD commit, `None` on an unborn branch
    pub fn head_commit(&self) -> Result<Option<String>, DriftError> {
        let head_error = |e| self.history_error(Path::new("HEAD"), e);
        let repo = self.git().map_err(head_error)?;

        if repo.is_empty().map_err(head_error)? {
            return Ok(None);
        }

        let head = repo.head();
        match head {
            Ok(head) => {
                let commit = head.peel_to_commit().map_err(head_error)?;
                Ok(Some(commit.id().to_string()))
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch => Ok(None),
            Err(e) => Err(head_error(e)),
        }
    }

    /// Path relative to the repository root, without `.` components
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root).unwrap_or(path)
        } else {
            path
        };
        clean_path(relative)
    }

    /// Open a libgit2 handle; the root was already discovered, so failures here are per-query
    fn git(&self) -> Result<GitRepo, git2::Error> {
        GitRepo::open(&self.root)
    }

    fn history_error(&self, path: &Path, source: git2::Error) -> DriftError {
        DriftError::HistoryQueryFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    fn walk_history(
        &self,
        repo: &GitRepo,
        path: &Path,
        options: &LogOptions,
    ) -> Result<Vec<Commit>, git2::Error> {
        let mut walk = repo.revwalk()?;
        if options.strict_date {
            walk.set_sorting(Sort::TIME)?;
        } else {
            walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        }

        match options.to.as_deref() {
            Some(rev) => walk.push(repo.revparse_single(rev)?.peel_to_commit()?.id())?,
            None => {
                if repo.is_empty()? {
                    return Ok(Vec::new());
                }
                walk.push_head()?;
            }
        }

        if let Some(from) = options.from.as_deref() {
            walk.hide(repo.revparse_single(from)?.peel_to_commit()?.id())?;
        }

        let limit = options.max_count.unwrap_or(usize::MAX);
        let mut commits = Vec::new();

        for oid in walk {
            if commits.len() >= limit {
                break;
            }
            let commit = repo.find_commit(oid?)?;
            if touches_path(&commit, path)? {
                commits.push(Commit::from_git(&commit));
            }
        }

        Ok(commits)
    }
}

impl HistoryProvider for Repository {
    fn file_history(&self, path: &Path, options: &LogOptions) -> Result<Vec<Commit>, DriftError> {
        let relative = self.relative_path(path);

        let commits = self
            .git()
            .and_then(|repo| self.walk_history(&repo, &relative, options))
            .map_err(|e| self.history_error(path, e))?;

        tracing::debug!("{:?}: {} commit(s) in history window", relative, commits.len());
        Ok(commits)
    }
}

impl ContentSource for Repository {
    fn content_at_commit(&self, path: &Path, commit: &str) -> Result<Option<String>, DriftError> {
        let relative = self.relative_path(path);
        let fetch_error = |source| DriftError::ContentFetchFailed {
            path: path.to_path_buf(),
            commit: commit.to_string(),
            source,
        };

        let repo = self.git().map_err(fetch_error)?;

        let oid = Oid::from_str(commit).map_err(fetch_error)?;
        let tree = repo
            .find_commit(oid)
            .and_then(|c| c.tree())
            .map_err(fetch_error)?;

        let entry = match tree.get_path(&relative) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(fetch_error(e)),
        };

        let object = entry.to_object(&repo).map_err(fetch_error)?;
        match object.as_blob() {
            Some(blob) => Ok(Some(String::from_utf8_lossy(blob.content()).into_owned())),
            None => Ok(None),
        }
    }

    fn current_content(&self, path: &Path) -> Result<String, DriftError> {
        let full_path = self.root.join(self.relative_path(path));
        std::fs::read_to_string(&full_path).map_err(|source| DriftError::FileRead {
            path: full_path,
            source,
        })
    }
}

/// Whether `commit` changed `path` relative to every parent
fn touches_path(commit: &git2::Commit<'_>, path: &Path) -> Result<bool, git2::Error> {
    let current = entry_id(&commit.tree()?, path);

    if commit.parent_count() == 0 {
        return Ok(current.is_some());
    }

    for parent in commit.parents() {
        if entry_id(&parent.tree()?, path) == current {
            return Ok(false);
        }
    }

    Ok(true)
}

fn entry_id(tree: &Tree<'_>, path: &Path) -> Option<Oid> {
    tree.get_path(path).ok().map(|entry| entry.id())
}

/// Drop `.` components so `./src/a.ts` and `src/a.ts` name the same tree entry
pub fn clean_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
