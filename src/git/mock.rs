//! git::mock
//!
//! Mock version-control implementation for deterministic testing.
//!
//! # Design
//!
//! `MockVcs` implements [`VersionControl`] entirely in memory, except for
//! the two primitives whose contract is to produce files
//! ([`VersionControl::export_patches`] and [`VersionControl::archive_to`]),
//! which write the configured contents into the requested directory. Every
//! call is recorded so tests can assert on what the engine did, and any
//! primitive can be made to fail.
//!
//! # Example
//!
//! ```
//! use patchstack::git::mock::{MockOperation, MockVcs};
//! use patchstack::git::{ApplyOutcome, VersionControl};
//! use std::path::PathBuf;
//!
//! let vcs = MockVcs::new("/work/Bukkit").conflict_on(2);
//! let outcome = vcs
//!     .apply_mailbox(&[PathBuf::from("a.patch"), PathBuf::from("b.patch")])
//!     .unwrap();
//!
//! assert_eq!(outcome, ApplyOutcome::Conflict { index: 2 });
//! assert_eq!(vcs.applied(), vec![PathBuf::from("a.patch")]);
//! assert!(vcs.state().unwrap().is_apply_session());
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::interface::{
    ApplyOutcome, ChangedPath, CommitInfo, GitError, GitState, VersionControl,
};
use crate::core::types::{BranchName, RemoteRef};

/// Mock version control for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockVcs {
    root: PathBuf,
    inner: Arc<Mutex<MockVcsInner>>,
}

#[derive(Debug)]
struct MockVcsInner {
    is_repo: bool,
    remotes: BTreeMap<String, String>,
    /// Branches each remote can serve on fetch.
    remote_branches: BTreeSet<(String, String)>,
    branches: BTreeSet<String>,
    current_branch: Option<String>,
    state: GitState,
    unstaged: Vec<ChangedPath>,
    staged: Vec<ChangedPath>,
    untracked: Vec<PathBuf>,
    /// 1-based patch position that conflicts in the next apply.
    conflict_on: Option<usize>,
    applied: Vec<PathBuf>,
    /// `(exported file name, content)` produced by `export_patches`.
    exports: Vec<(String, String)>,
    /// Tracked files written by `archive_to`.
    files: BTreeMap<PathBuf, Vec<u8>>,
    head: CommitInfo,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Which primitive should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Init,
    Clone,
    SubmoduleUpdate,
    AddRemote,
    Checkout,
    Fetch,
    HardReset,
    CleanUntracked,
    ApplyMailbox,
    AbortMailbox,
    ExportPatches,
    ArchiveTo,
}

/// Recorded mutating operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Init,
    Clone { source: String },
    SubmoduleUpdate { path: PathBuf },
    AddRemote { name: String, url: String },
    CreateBranch { name: String },
    Checkout { name: String },
    Fetch { refspec: String },
    HardReset { refname: String },
    RefreshIndex,
    CleanUntracked,
    ApplyMailbox { patches: Vec<PathBuf> },
    AbortMailbox,
    ExportPatches { since: String },
    ArchiveTo { dest: PathBuf },
}

impl MockVcs {
    /// A mock bound to `root` with an existing, clean repository on `main`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            inner: Arc::new(Mutex::new(MockVcsInner {
                is_repo: true,
                remotes: BTreeMap::new(),
                remote_branches: BTreeSet::new(),
                branches: BTreeSet::from(["main".to_string()]),
                current_branch: Some("main".to_string()),
                state: GitState::Clean,
                unstaged: Vec::new(),
                staged: Vec::new(),
                untracked: Vec::new(),
                conflict_on: None,
                applied: Vec::new(),
                exports: Vec::new(),
                files: BTreeMap::new(),
                head: CommitInfo {
                    oid: "0".repeat(40),
                    summary: "Initial commit".to_string(),
                    author_time: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
                    committer_time: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
                },
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// A mock bound to `root` where no repository exists yet.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        let mock = Self::new(root);
        {
            let mut inner = mock.inner.lock().unwrap();
            inner.is_repo = false;
            inner.branches.clear();
            inner.current_branch = None;
        }
        mock
    }

    pub fn with_remote(self, name: &str, url: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .remotes
            .insert(name.to_string(), url.to_string());
        self
    }

    /// Make `branch` fetchable from `remote`.
    pub fn with_remote_branch(self, remote: &str, branch: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .remote_branches
            .insert((remote.to_string(), branch.to_string()));
        self
    }

    pub fn with_unstaged(self, change: ChangedPath) -> Self {
        self.inner.lock().unwrap().unstaged.push(change);
        self
    }

    pub fn with_staged(self, change: ChangedPath) -> Self {
        self.inner.lock().unwrap().staged.push(change);
        self
    }

    pub fn with_untracked(self, path: impl Into<PathBuf>) -> Self {
        self.inner.lock().unwrap().untracked.push(path.into());
        self
    }

    pub fn with_state(self, state: GitState) -> Self {
        self.inner.lock().unwrap().state = state;
        self
    }

    /// Make the patch at 1-based `position` of the next apply conflict.
    pub fn conflict_on(self, position: usize) -> Self {
        self.inner.lock().unwrap().conflict_on = Some(position);
        self
    }

    /// Add a commit that `export_patches` will write as `file_name`.
    pub fn with_export(self, file_name: &str, content: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .exports
            .push((file_name.to_string(), content.to_string()));
        self
    }

    /// Add a tracked file at HEAD.
    pub fn with_file(self, path: impl Into<PathBuf>, content: &[u8]) -> Self {
        self.inner
            .lock()
            .unwrap()
            .files
            .insert(path.into(), content.to_vec());
        self
    }

    pub fn with_head_summary(self, summary: &str) -> Self {
        self.inner.lock().unwrap().head.summary = summary.to_string();
        self
    }

    pub fn with_head_times(
        self,
        author: chrono::DateTime<chrono::Utc>,
        committer: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.head.author_time = author;
            inner.head.committer_time = committer;
        }
        self
    }

    pub fn fail_on(self, op: FailOn) -> Self {
        self.inner.lock().unwrap().fail_on = Some(op);
        self
    }

    /// Mutating operations recorded so far, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Patch files committed by `apply_mailbox` so far.
    pub fn applied(&self) -> Vec<PathBuf> {
        self.inner.lock().unwrap().applied.clone()
    }

    pub fn current_branch(&self) -> Option<String> {
        self.inner.lock().unwrap().current_branch.clone()
    }

    pub fn remote_url(&self, name: &str) -> Option<String> {
        self.inner.lock().unwrap().remotes.get(name).cloned()
    }

    fn record(&self, op: MockOperation) {
        self.inner.lock().unwrap().operations.push(op);
    }

    fn check_fail(&self, op: FailOn) -> Result<(), GitError> {
        if self.inner.lock().unwrap().fail_on == Some(op) {
            return Err(GitError::CommandFailed {
                command: format!("mock {op:?}"),
                code: Some(1),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn require_repo(&self) -> Result<(), GitError> {
        if self.inner.lock().unwrap().is_repo {
            Ok(())
        } else {
            Err(GitError::NotARepo {
                path: self.root.clone(),
            })
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> GitError {
    GitError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl VersionControl for MockVcs {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_repo(&self) -> bool {
        self.inner.lock().unwrap().is_repo
    }

    fn init(&self) -> Result<(), GitError> {
        self.record(MockOperation::Init);
        self.check_fail(FailOn::Init)?;
        self.inner.lock().unwrap().is_repo = true;
        Ok(())
    }

    fn clone_from(&self, source: &str) -> Result<(), GitError> {
        self.record(MockOperation::Clone {
            source: source.to_string(),
        });
        self.check_fail(FailOn::Clone)?;
        let mut inner = self.inner.lock().unwrap();
        inner.is_repo = true;
        inner.remotes.insert("origin".to_string(), source.to_string());
        inner.branches.insert("main".to_string());
        inner.current_branch = Some("main".to_string());
        Ok(())
    }

    fn submodule_update(&self, path: &Path) -> Result<(), GitError> {
        self.require_repo()?;
        self.record(MockOperation::SubmoduleUpdate {
            path: path.to_path_buf(),
        });
        self.check_fail(FailOn::SubmoduleUpdate)
    }

    fn remotes(&self) -> Result<Vec<String>, GitError> {
        self.require_repo()?;
        Ok(self.inner.lock().unwrap().remotes.keys().cloned().collect())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.require_repo()?;
        self.record(MockOperation::AddRemote {
            name: name.to_string(),
            url: url.to_string(),
        });
        self.check_fail(FailOn::AddRemote)?;
        let mut inner = self.inner.lock().unwrap();
        if inner.remotes.contains_key(name) {
            return Err(GitError::Internal {
                message: format!("remote '{name}' already exists"),
            });
        }
        inner.remotes.insert(name.to_string(), url.to_string());
        Ok(())
    }

    fn branch_exists(&self, name: &BranchName) -> Result<bool, GitError> {
        self.require_repo()?;
        Ok(self.inner.lock().unwrap().branches.contains(name.as_str()))
    }

    fn create_branch(&self, name: &BranchName) -> Result<(), GitError> {
        self.require_repo()?;
        self.record(MockOperation::CreateBranch {
            name: name.to_string(),
        });
        self.inner
            .lock()
            .unwrap()
            .branches
            .insert(name.to_string());
        Ok(())
    }

    fn checkout(&self, name: &BranchName) -> Result<(), GitError> {
        self.require_repo()?;
        self.record(MockOperation::Checkout {
            name: name.to_string(),
        });
        self.check_fail(FailOn::Checkout)?;
        let mut inner = self.inner.lock().unwrap();
        if !inner.branches.contains(name.as_str()) {
            return Err(GitError::RefNotFound {
                refname: name.local_ref(),
            });
        }
        inner.current_branch = Some(name.to_string());
        Ok(())
    }

    fn fetch(&self, target: &RemoteRef) -> Result<(), GitError> {
        self.require_repo()?;
        self.record(MockOperation::Fetch {
            refspec: target.refspec(),
        });
        self.check_fail(FailOn::Fetch)?;
        let inner = self.inner.lock().unwrap();
        let key = (target.remote.to_string(), target.branch.to_string());
        if !inner.remotes.contains_key(target.remote.as_str()) || !inner.remote_branches.contains(&key)
        {
            return Err(GitError::CommandFailed {
                command: format!("git fetch {} {}", target.remote, target.refspec()),
                code: Some(128),
                stderr: format!("fatal: couldn't find remote ref {}", target.branch.local_ref()),
            });
        }
        Ok(())
    }

    fn hard_reset(&self, refname: &str) -> Result<(), GitError> {
        self.require_repo()?;
        self.record(MockOperation::HardReset {
            refname: refname.to_string(),
        });
        self.check_fail(FailOn::HardReset)?;
        let mut inner = self.inner.lock().unwrap();
        inner.unstaged.clear();
        inner.staged.clear();
        Ok(())
    }

    fn state(&self) -> Result<GitState, GitError> {
        self.require_repo()?;
        Ok(self.inner.lock().unwrap().state.clone())
    }

    fn refresh_index(&self) -> Result<(), GitError> {
        self.require_repo()?;
        self.record(MockOperation::RefreshIndex);
        Ok(())
    }

    fn unstaged_changes(&self) -> Result<Vec<ChangedPath>, GitError> {
        self.require_repo()?;
        Ok(self.inner.lock().unwrap().unstaged.clone())
    }

    fn staged_changes(&self) -> Result<Vec<ChangedPath>, GitError> {
        self.require_repo()?;
        Ok(self.inner.lock().unwrap().staged.clone())
    }

    fn clean_untracked(&self) -> Result<Vec<PathBuf>, GitError> {
        self.require_repo()?;
        self.record(MockOperation::CleanUntracked);
        self.check_fail(FailOn::CleanUntracked)?;
        Ok(std::mem::take(&mut self.inner.lock().unwrap().untracked))
    }

    fn apply_mailbox(&self, patches: &[PathBuf]) -> Result<ApplyOutcome, GitError> {
        self.require_repo()?;
        self.record(MockOperation::ApplyMailbox {
            patches: patches.to_vec(),
        });
        self.check_fail(FailOn::ApplyMailbox)?;

        let mut inner = self.inner.lock().unwrap();
        match inner.conflict_on {
            Some(index) if index >= 1 && index <= patches.len() => {
                inner.applied.extend_from_slice(&patches[..index - 1]);
                inner.state = GitState::ApplyMailbox {
                    current: Some(index),
                    total: Some(patches.len()),
                };
                Ok(ApplyOutcome::Conflict { index })
            }
            _ => {
                inner.applied.extend_from_slice(patches);
                Ok(ApplyOutcome::Applied {
                    count: patches.len(),
                })
            }
        }
    }

    fn abort_mailbox(&self) -> Result<(), GitError> {
        self.require_repo()?;
        self.record(MockOperation::AbortMailbox);
        self.check_fail(FailOn::AbortMailbox)?;
        let mut inner = self.inner.lock().unwrap();
        if !inner.state.is_apply_session() {
            return Err(GitError::CommandFailed {
                command: "git am --abort".to_string(),
                code: Some(128),
                stderr: "fatal: Resolve operation not in progress".to_string(),
            });
        }
        inner.state = GitState::Clean;
        Ok(())
    }

    fn export_patches(&self, since: &str, out_dir: &Path) -> Result<Vec<PathBuf>, GitError> {
        self.require_repo()?;
        self.record(MockOperation::ExportPatches {
            since: since.to_string(),
        });
        self.check_fail(FailOn::ExportPatches)?;

        let exports = self.inner.lock().unwrap().exports.clone();
        let mut written = Vec::with_capacity(exports.len());
        for (file_name, content) in exports {
            let path = out_dir.join(file_name);
            fs::write(&path, content).map_err(|e| io_error(&path, e))?;
            written.push(path);
        }
        Ok(written)
    }

    fn archive_to(&self, dest: &Path) -> Result<(), GitError> {
        self.require_repo()?;
        self.record(MockOperation::ArchiveTo {
            dest: dest.to_path_buf(),
        });
        self.check_fail(FailOn::ArchiveTo)?;

        let files = self.inner.lock().unwrap().files.clone();
        for (relative, content) in files {
            let path = dest.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
            fs::write(&path, content).map_err(|e| io_error(&path, e))?;
        }
        Ok(())
    }

    fn head_commit(&self) -> Result<CommitInfo, GitError> {
        self.require_repo()?;
        Ok(self.inner.lock().unwrap().head.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RemoteName;

    #[test]
    fn empty_mock_is_not_a_repo() {
        let vcs = MockVcs::empty("/tmp/x");
        assert!(!vcs.is_repo());
        assert!(matches!(vcs.remotes(), Err(GitError::NotARepo { .. })));
        vcs.init().unwrap();
        assert!(vcs.is_repo());
    }

    #[test]
    fn fetch_requires_known_remote_branch() {
        let target = RemoteRef::new(
            RemoteName::new("upstream").unwrap(),
            BranchName::new("main").unwrap(),
        );
        let vcs = MockVcs::new("/tmp/x").with_remote("upstream", "https://example.com/r.git");
        assert!(vcs.fetch(&target).is_err());

        let vcs = vcs.with_remote_branch("upstream", "main");
        assert!(vcs.fetch(&target).is_ok());
    }

    #[test]
    fn abort_clears_session() {
        let vcs = MockVcs::new("/tmp/x").with_state(GitState::ApplyMailbox {
            current: Some(1),
            total: Some(1),
        });
        vcs.abort_mailbox().unwrap();
        assert_eq!(vcs.state().unwrap(), GitState::Clean);
        assert!(vcs.abort_mailbox().is_err());
    }

    #[test]
    fn fail_on_injects_error() {
        let vcs = MockVcs::new("/tmp/x").fail_on(FailOn::HardReset);
        assert!(vcs.hard_reset("refs/remotes/origin/main").is_err());
        assert_eq!(
            vcs.operations(),
            vec![MockOperation::HardReset {
                refname: "refs/remotes/origin/main".to_string()
            }]
        );
    }
}
