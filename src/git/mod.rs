//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads and
//! writes flow through the [`VersionControl`] trait. No other module
//! imports `git2` or spawns the `git` CLI.
//!
//! # Responsibilities
//!
//! - Repository bootstrap (init, clone, submodules, remotes, branches)
//! - Fetch with explicit refspecs and hard reset
//! - Status and state detection, including apply sessions
//! - Mailbox apply/abort and patch export
//! - Tree export into plain directories
//!
//! # Invariants
//!
//! - Decisions are made from exit codes and repository state, never from
//!   human-readable git output
//! - A [`Git`] value is bound to exactly one working copy root
//!
//! # Testing
//!
//! [`mock::MockVcs`] implements the same trait in memory so engine code can
//! be exercised without a repository.

mod interface;
pub mod mock;

pub use interface::{
    ApplyOutcome, ChangedPath, CommitInfo, Git, GitError, GitState, VersionControl,
};
