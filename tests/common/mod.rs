#![allow(dead_code)]

use assert_cmd::Command;
use git2::{Oid, Repository, Signature, Time};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throw-away git repository with deterministic commit times
pub struct TestRepo {
    _tmp: TempDir,
    pub root: PathBuf,
    git: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        let git = Repository::init(&root).expect("init git repo");
        Self { _tmp: tmp, root, git }
    }

    /// Write `.docgap.toml` without committing it
    pub fn config(&self, toml: &str) {
        fs::write(self.root.join(".docgap.toml"), toml).expect("write config");
    }

    pub fn write(&self, path: &str, content: &str) {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(full, content).expect("write file");
    }

    /// Write `files`, stage them and commit at `time` (seconds since epoch)
    pub fn commit(&self, files: &[(&str, &str)], message: &str, time: i64) -> Oid {
        let mut index = self.git.index().expect("open index");
        for (path, content) in files {
            self.write(path, content);
            index.add_path(Path::new(path)).expect("stage file");
        }
        index.write().expect("write index");

        let tree = self
            .git
            .find_tree(index.write_tree().expect("write tree"))
            .expect("find tree");
        let sig = Signature::new("Test User", "test@example.com", &Time::new(time, 0))
            .expect("signature");
        let parent = self.git.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();

        self.git
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("commit")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("docgap").expect("docgap binary");
        cmd.arg("--path").arg(&self.root).env_remove("DOCGAP_CONFIG");
        cmd
    }
}

pub const MAIN_RULE: &str = r#"
[[rules]]
doc = "docs/main.md"
source = "src/main.ts"
"#;

/// Doc and source committed together at t=1000
pub fn baseline() -> TestRepo {
    let repo = TestRepo::new();
    repo.config(MAIN_RULE);
    repo.commit(
        &[
            ("docs/main.md", "# Main\n\nThe main module logs a number.\n"),
            ("src/main.ts", "console.log(1);"),
        ],
        "Initial commit",
        1_000,
    );
    repo
}
