//! git::interface
//!
//! The version-control capability and its git implementation.
//!
//! This module is the **single doorway** to Git. The engine only sees the
//! [`VersionControl`] trait, whose primitives return structured results
//! (exit codes, repository state, parsed change lists) so no caller ever
//! inspects human-readable git output to make a decision.
//!
//! # Implementation split
//!
//! [`Git`] uses `git2` for local object, ref, index and worktree work
//! (state detection, diffs, reset, clean, tree export). Transport and
//! mailbox operations (clone, fetch, submodule update, `am`,
//! `format-patch`) run the `git` CLI, since libgit2 has no equivalent of
//! `am --3way` and is built here without network transports.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: No repository at the bound path
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::CommandFailed`]: A git CLI invocation exited unsuccessfully
//! - [`GitError::Spawn`]: The git CLI could not be started
//!
//! # Example
//!
//! ```ignore
//! use patchstack::git::{Git, VersionControl};
//! use std::path::Path;
//!
//! let git = Git::at("work/Bukkit");
//! if !git.is_repo() {
//!     git.init()?;
//! }
//! println!("HEAD: {}", git.head_commit()?.summary);
//! ```

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use thiserror::Error;

use crate::core::types::{BranchName, RemoteRef};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository at the bound path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// A git CLI invocation exited unsuccessfully.
    #[error("`{command}` failed ({}): {}", code_label(.code), .stderr.trim())]
    CommandFailed {
        /// The command line, for display
        command: String,
        /// Exit code, `None` if terminated by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The git CLI could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// Filesystem error while reading or writing worktree content.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

fn code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "killed by signal".to_string(),
    }
}

impl GitError {
    /// Create a GitError from a git2::Error with context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::UnbornBranch => GitError::RefNotFound {
                refname: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        GitError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// State of in-progress Git operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitState {
    /// No operation in progress.
    Clean,

    /// Mailbox apply (`git am`) in progress: an apply session.
    ApplyMailbox {
        /// Patch being applied when the session stopped (1-indexed).
        current: Option<usize>,
        /// Total patches in the session.
        total: Option<usize>,
    },

    /// Rebase in progress.
    Rebase,

    /// Merge in progress.
    Merge,

    /// Cherry-pick or revert in progress.
    CherryPick,

    /// Bisect in progress.
    Bisect,
}

impl GitState {
    /// Check if any operation is in progress.
    ///
    /// # Example
    ///
    /// ```
    /// use patchstack::git::GitState;
    ///
    /// assert!(!GitState::Clean.is_in_progress());
    /// assert!(GitState::Merge.is_in_progress());
    /// ```
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, GitState::Clean)
    }

    /// True if an apply session is in progress.
    pub fn is_apply_session(&self) -> bool {
        matches!(self, GitState::ApplyMailbox { .. })
    }

    pub fn description(&self) -> &'static str {
        match self {
            GitState::Clean => "clean",
            GitState::ApplyMailbox { .. } => "apply-mailbox",
            GitState::Rebase => "rebase",
            GitState::Merge => "merge",
            GitState::CherryPick => "cherry-pick",
            GitState::Bisect => "bisect",
        }
    }
}

impl fmt::Display for GitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitState::ApplyMailbox {
                current: Some(c),
                total: Some(t),
            } => write!(f, "apply-mailbox ({}/{})", c, t),
            _ => write!(f, "{}", self.description()),
        }
    }
}

/// A path reported by a diff, with its `--name-status` letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedPath {
    /// One of `A`, `D`, `M`, `R`, `C`, `T`, `U`
    pub status: char,
    pub path: PathBuf,
}

impl ChangedPath {
    pub fn new(status: char, path: impl Into<PathBuf>) -> Self {
        Self {
            status,
            path: path.into(),
        }
    }
}

impl fmt::Display for ChangedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.status, self.path.display())
    }
}

/// Result of applying a batch of mailbox patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Every patch was committed.
    Applied { count: usize },
    /// The patch at `index` (1-based) could not be applied; the session
    /// is still in progress.
    Conflict { index: usize },
}

/// Information about a commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// The commit OID (hex)
    pub oid: String,
    /// First line of the commit message
    pub summary: String,
    /// Author timestamp
    pub author_time: chrono::DateTime<chrono::Utc>,
    /// Committer timestamp
    pub committer_time: chrono::DateTime<chrono::Utc>,
}

/// The version-control capability the engine is written against.
///
/// A value of this trait is bound to one repository root. Bootstrap
/// primitives (`init`, `clone_from`) create the repository at that root;
/// all others require it to exist.
pub trait VersionControl {
    /// Root directory of the working copy.
    fn root(&self) -> &Path;

    /// True if a repository exists at the root.
    fn is_repo(&self) -> bool;

    /// Create an empty repository at the root.
    fn init(&self) -> Result<(), GitError>;

    /// Clone `source` into the root.
    fn clone_from(&self, source: &str) -> Result<(), GitError>;

    /// Initialize and check out the submodule at `path` (relative to root).
    fn submodule_update(&self, path: &Path) -> Result<(), GitError>;

    /// Names of configured remotes.
    fn remotes(&self) -> Result<Vec<String>, GitError>;

    /// Register a new remote.
    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError>;

    fn branch_exists(&self, name: &BranchName) -> Result<bool, GitError>;

    /// Create `name` at the current commit without switching to it.
    fn create_branch(&self, name: &BranchName) -> Result<(), GitError>;

    /// Switch the worktree and HEAD to an existing local branch.
    fn checkout(&self, name: &BranchName) -> Result<(), GitError>;

    /// Fetch `target` using its explicit refspec.
    fn fetch(&self, target: &RemoteRef) -> Result<(), GitError>;

    /// Force HEAD, index and worktree to match `refname`.
    fn hard_reset(&self, refname: &str) -> Result<(), GitError>;

    /// In-progress operation, if any.
    fn state(&self) -> Result<GitState, GitError>;

    /// Reload the index and refresh its stat cache.
    fn refresh_index(&self) -> Result<(), GitError>;

    /// Worktree changes not staged in the index (submodules ignored).
    fn unstaged_changes(&self) -> Result<Vec<ChangedPath>, GitError>;

    /// Index changes relative to the current commit (submodules ignored).
    fn staged_changes(&self) -> Result<Vec<ChangedPath>, GitError>;

    /// Delete untracked files and directories; ignored files are kept.
    /// Returns the removed paths relative to the root.
    fn clean_untracked(&self) -> Result<Vec<PathBuf>, GitError>;

    /// Apply mailbox patches in order, one commit each, with three-way
    /// fallback, whitespace-insensitive context matching and committer
    /// date set to author date.
    fn apply_mailbox(&self, patches: &[PathBuf]) -> Result<ApplyOutcome, GitError>;

    /// Abort the in-progress apply session, restoring the pre-session state.
    fn abort_mailbox(&self) -> Result<(), GitError>;

    /// Export commits in `since..HEAD` as mailbox files in `out_dir`,
    /// oldest first. Returns the created files in export order.
    fn export_patches(&self, since: &str, out_dir: &Path) -> Result<Vec<PathBuf>, GitError>;

    /// Write the tracked content of the current commit into `dest`.
    fn archive_to(&self, dest: &Path) -> Result<(), GitError>;

    /// The commit HEAD points at.
    fn head_commit(&self) -> Result<CommitInfo, GitError>;
}

/// The git implementation of [`VersionControl`].
///
/// Holds only the root path; the repository is opened per operation so a
/// `Git` can be created before `init`/`clone_from` make the repository
/// exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    /// Bind to the working copy at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the repository at the root (no upward discovery).
    fn open(&self) -> Result<git2::Repository, GitError> {
        git2::Repository::open(&self.root).map_err(|_| GitError::NotARepo {
            path: self.root.clone(),
        })
    }

    /// Build a git CLI command running in the root.
    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.root).args(args);
        cmd
    }

    /// Run a command and capture its output, whatever the exit status.
    fn output(cmd: &mut Command) -> Result<Output, GitError> {
        cmd.output().map_err(|source| GitError::Spawn {
            command: describe(cmd),
            source,
        })
    }

    /// Run a command, failing on a non-zero exit status.
    fn run_checked(cmd: &mut Command) -> Result<Output, GitError> {
        let output = Self::output(cmd)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(GitError::CommandFailed {
                command: describe(cmd),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }

    fn head_tree(repo: &git2::Repository) -> Result<Option<git2::Tree<'_>>, GitError> {
        match repo.head() {
            Ok(head) => Ok(Some(
                head.peel_to_tree()
                    .map_err(|e| GitError::from_git2(e, "HEAD"))?,
            )),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::from_git2(e, "HEAD")),
        }
    }

    /// Remove the directories above `relative` that are now empty, stopping
    /// at the first one that still holds something (ignored files included).
    fn prune_empty_parents(&self, relative: &Path) -> Result<(), GitError> {
        for parent in relative.ancestors().skip(1) {
            if parent.as_os_str().is_empty() {
                break;
            }
            let dir = self.root.join(parent);
            let mut entries = fs::read_dir(&dir).map_err(|e| GitError::io(&dir, e))?;
            if entries.next().is_some() {
                break;
            }
            fs::remove_dir(&dir).map_err(|e| GitError::io(&dir, e))?;
        }
        Ok(())
    }

    /// Read apply-session progress from `.git/rebase-apply`.
    fn read_mailbox_progress(git_dir: &Path) -> (Option<usize>, Option<usize>) {
        let dir = git_dir.join("rebase-apply");
        let read = |name: &str| {
            fs::read_to_string(dir.join(name))
                .ok()
                .and_then(|s| s.trim().parse().ok())
        };
        (read("next"), read("last"))
    }
}

/// Render a command line for error messages.
fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn delta_letter(status: git2::Delta) -> char {
    match status {
        git2::Delta::Added => 'A',
        git2::Delta::Deleted => 'D',
        git2::Delta::Modified => 'M',
        git2::Delta::Renamed => 'R',
        git2::Delta::Copied => 'C',
        git2::Delta::Typechange => 'T',
        git2::Delta::Conflicted => 'U',
        _ => 'X',
    }
}

fn collect_changes(diff: &git2::Diff<'_>) -> Vec<ChangedPath> {
    diff.deltas()
        .filter_map(|delta| {
            let path = delta.new_file().path().or_else(|| delta.old_file().path())?;
            Some(ChangedPath::new(delta_letter(delta.status()), path))
        })
        .collect()
}

const MODE_TREE: i32 = 0o040000;
const MODE_EXECUTABLE: i32 = 0o100755;
const MODE_SYMLINK: i32 = 0o120000;
const MODE_GITLINK: i32 = 0o160000;

impl VersionControl for Git {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_repo(&self) -> bool {
        self.root.join(".git").exists()
    }

    fn init(&self) -> Result<(), GitError> {
        git2::Repository::init(&self.root)
            .map(|_| ())
            .map_err(|e| GitError::from_git2(e, &self.root.display().to_string()))
    }

    fn clone_from(&self, source: &str) -> Result<(), GitError> {
        let mut cmd = Command::new("git");
        cmd.arg("clone").arg(source).arg(&self.root);
        Self::run_checked(&mut cmd).map(|_| ())
    }

    fn submodule_update(&self, path: &Path) -> Result<(), GitError> {
        let mut cmd = self.command(["submodule", "update", "--init", "--"]);
        cmd.arg(path);
        Self::run_checked(&mut cmd).map(|_| ())
    }

    fn remotes(&self) -> Result<Vec<String>, GitError> {
        let repo = self.open()?;
        let remotes = repo.remotes()?;
        Ok(remotes.iter().flatten().map(String::from).collect())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        let repo = self.open()?;
        repo.remote(name, url)
            .map(|_| ())
            .map_err(|e| GitError::from_git2(e, name))
    }

    fn branch_exists(&self, name: &BranchName) -> Result<bool, GitError> {
        let repo = self.open()?;
        let exists = match repo.find_branch(name.as_str(), git2::BranchType::Local) {
            Ok(_) => true,
            Err(e) if e.code() == git2::ErrorCode::NotFound => false,
            Err(e) => return Err(GitError::from_git2(e, &name.local_ref())),
        };
        Ok(exists)
    }

    fn create_branch(&self, name: &BranchName) -> Result<(), GitError> {
        let repo = self.open()?;
        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;
        repo.branch(name.as_str(), &head, false)
            .map(|_| ())
            .map_err(|e| GitError::from_git2(e, &name.local_ref()))
    }

    fn checkout(&self, name: &BranchName) -> Result<(), GitError> {
        let repo = self.open()?;
        let refname = name.local_ref();
        let target = repo
            .revparse_single(&refname)
            .map_err(|e| GitError::from_git2(e, &refname))?;

        let mut opts = git2::build::CheckoutBuilder::new();
        opts.safe();
        repo.checkout_tree(&target, Some(&mut opts))?;
        repo.set_head(&refname)?;
        Ok(())
    }

    fn fetch(&self, target: &RemoteRef) -> Result<(), GitError> {
        let mut cmd = self.command(["fetch"]);
        cmd.arg(target.remote.as_str()).arg(target.refspec());
        Self::run_checked(&mut cmd).map(|_| ())
    }

    fn hard_reset(&self, refname: &str) -> Result<(), GitError> {
        let repo = self.open()?;
        let commit = repo
            .revparse_single(refname)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, refname))?;
        repo.reset(commit.as_object(), git2::ResetType::Hard, None)?;
        Ok(())
    }

    fn state(&self) -> Result<GitState, GitError> {
        let repo = self.open()?;
        Ok(match repo.state() {
            git2::RepositoryState::Clean => GitState::Clean,
            git2::RepositoryState::ApplyMailbox
            | git2::RepositoryState::ApplyMailboxOrRebase => {
                let (current, total) = Self::read_mailbox_progress(repo.path());
                GitState::ApplyMailbox { current, total }
            }
            git2::RepositoryState::Rebase
            | git2::RepositoryState::RebaseInteractive
            | git2::RepositoryState::RebaseMerge => GitState::Rebase,
            git2::RepositoryState::Merge => GitState::Merge,
            git2::RepositoryState::CherryPick
            | git2::RepositoryState::CherryPickSequence
            | git2::RepositoryState::Revert
            | git2::RepositoryState::RevertSequence => GitState::CherryPick,
            git2::RepositoryState::Bisect => GitState::Bisect,
        })
    }

    fn refresh_index(&self) -> Result<(), GitError> {
        let repo = self.open()?;
        let mut index = repo.index()?;
        index.read(true)?;

        // A diff with update_index rewrites stale stat entries.
        let mut opts = git2::DiffOptions::new();
        opts.ignore_submodules(true).update_index(true);
        repo.diff_index_to_workdir(Some(&index), Some(&mut opts))?;
        Ok(())
    }

    fn unstaged_changes(&self) -> Result<Vec<ChangedPath>, GitError> {
        let repo = self.open()?;
        let mut opts = git2::DiffOptions::new();
        opts.ignore_submodules(true).include_untracked(false);
        let diff = repo.diff_index_to_workdir(None, Some(&mut opts))?;
        Ok(collect_changes(&diff))
    }

    fn staged_changes(&self) -> Result<Vec<ChangedPath>, GitError> {
        let repo = self.open()?;
        let tree = Self::head_tree(&repo)?;
        let mut opts = git2::DiffOptions::new();
        opts.ignore_submodules(true);
        let diff = repo.diff_tree_to_index(tree.as_ref(), None, Some(&mut opts))?;
        Ok(collect_changes(&diff))
    }

    fn clean_untracked(&self) -> Result<Vec<PathBuf>, GitError> {
        let repo = self.open()?;
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(true);

        let untracked: Vec<PathBuf> = repo
            .statuses(Some(&mut opts))?
            .iter()
            .filter(|entry| entry.status().is_wt_new())
            .filter_map(|entry| entry.path().map(PathBuf::from))
            .collect();

        let mut removed = Vec::new();
        for relative in untracked {
            let path = self.root.join(&relative);
            // Only nested repositories are reported as directories; they
            // are left alone, like `git clean -d`.
            if fs::symlink_metadata(&path).is_ok_and(|meta| meta.is_dir()) {
                continue;
            }
            fs::remove_file(&path).map_err(|e| GitError::io(&path, e))?;
            self.prune_empty_parents(&relative)?;
            removed.push(relative);
        }
        Ok(removed)
    }

    fn apply_mailbox(&self, patches: &[PathBuf]) -> Result<ApplyOutcome, GitError> {
        if patches.is_empty() {
            return Ok(ApplyOutcome::Applied { count: 0 });
        }

        let mut cmd = self.command([
            "am",
            "--3way",
            "--ignore-whitespace",
            "--committer-date-is-author-date",
        ]);
        cmd.args(patches);
        let output = Self::output(&mut cmd)?;

        if output.status.success() {
            return Ok(ApplyOutcome::Applied {
                count: patches.len(),
            });
        }

        // The session records which patch stopped it.
        match self.state()? {
            GitState::ApplyMailbox {
                current: Some(index),
                ..
            } => Ok(ApplyOutcome::Conflict { index }),
            _ => Err(GitError::CommandFailed {
                command: describe(&cmd),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
        }
    }

    fn abort_mailbox(&self) -> Result<(), GitError> {
        Self::run_checked(&mut self.command(["am", "--abort"])).map(|_| ())
    }

    fn export_patches(&self, since: &str, out_dir: &Path) -> Result<Vec<PathBuf>, GitError> {
        let out_dir = out_dir
            .canonicalize()
            .map_err(|e| GitError::io(out_dir, e))?;

        let mut cmd = self.command(["format-patch", "--no-stat", "--no-signature", "-N", "-o"]);
        cmd.arg(&out_dir).arg(since);
        let output = Self::run_checked(&mut cmd)?;

        // format-patch prints one created file per line, in commit order.
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let path = PathBuf::from(line);
                if path.is_absolute() {
                    path
                } else {
                    self.root.join(path)
                }
            })
            .collect())
    }

    fn archive_to(&self, dest: &Path) -> Result<(), GitError> {
        let repo = self.open()?;
        let tree = repo
            .head()
            .and_then(|h| h.peel_to_tree())
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let mut entries = Vec::new();
        tree.walk(git2::TreeWalkMode::PreOrder, |dir, entry| {
            if let Some(name) = entry.name() {
                entries.push((Path::new(dir).join(name), entry.id(), entry.filemode()));
            }
            git2::TreeWalkResult::Ok
        })?;

        for (relative, oid, mode) in entries {
            let target = dest.join(&relative);
            match mode {
                MODE_TREE | MODE_GITLINK => {
                    fs::create_dir_all(&target).map_err(|e| GitError::io(&target, e))?;
                }
                _ => {
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent).map_err(|e| GitError::io(parent, e))?;
                    }
                    let blob = repo.find_blob(oid)?;
                    write_entry(&target, blob.content(), mode)?;
                }
            }
        }
        Ok(())
    }

    fn head_commit(&self) -> Result<CommitInfo, GitError> {
        let repo = self.open()?;
        let commit = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let to_utc = |seconds: i64| {
            chrono::DateTime::from_timestamp(seconds, 0)
                .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH)
        };

        let author = commit.author();
        let committer = commit.committer();
        let info = CommitInfo {
            oid: commit.id().to_string(),
            summary: commit.summary().unwrap_or("").to_string(),
            author_time: to_utc(author.when().seconds()),
            committer_time: to_utc(committer.when().seconds()),
        };
        Ok(info)
    }
}

/// Write one blob from a tree walk, honoring its file mode.
fn write_entry(target: &Path, content: &[u8], mode: i32) -> Result<(), GitError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if mode == MODE_SYMLINK {
            let link = String::from_utf8_lossy(content).into_owned();
            return std::os::unix::fs::symlink(link, target).map_err(|e| GitError::io(target, e));
        }

        fs::write(target, content).map_err(|e| GitError::io(target, e))?;
        if mode == MODE_EXECUTABLE {
            fs::set_permissions(target, fs::Permissions::from_mode(0o755))
                .map_err(|e| GitError::io(target, e))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        let _ = mode;
        fs::write(target, content).map_err(|e| GitError::io(target, e))
    }
}
