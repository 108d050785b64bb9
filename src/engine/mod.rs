//! engine
//!
//! The patch-stack engine: repository synchronization, clean-tree gating,
//! patch application, patch generation and tree export.
//!
//! # Architecture
//!
//! Every operation is a blocking function generic over
//! [`VersionControl`], so the same code runs against a real [`Git`]
//! working copy and the in-memory [`MockVcs`]. Progress is reported through
//! an explicit [`Reporter`]; the `force` flag is an explicit parameter.
//!
//! ```text
//! sync (init/clone/reset) -> guard -> apply -> generate -> export
//! ```
//!
//! # Invariants
//!
//! - Nothing here parses human-readable git output; outcomes come from the
//!   capability's structured results
//! - A failed step never undoes earlier steps of the same call
//! - Patch sets are consumed and produced wholesale
//!
//! [`Git`]: crate::git::Git
//! [`MockVcs`]: crate::git::mock::MockVcs
//! [`Reporter`]: crate::ui::output::Reporter

pub mod apply;
pub mod export;
pub mod generate;
pub mod guard;
pub mod sync;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::patchset::PatchSetError;
use crate::core::types::PatchName;
use crate::git::{ChangedPath, GitError, VersionControl};
use crate::ui::output::format_list;

pub use apply::apply_patches;
pub use export::export_tree;
pub use generate::{generate_patches, GenerateWarning, GeneratedPatchSet};
pub use guard::assert_clean_work_tree;

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The working tree or index has changes; nothing was modified.
    #[error("working tree is not clean{}{}", render_changes("unstaged", .unstaged), render_changes("staged", .staged))]
    DirtyWorkTree {
        unstaged: Vec<ChangedPath>,
        staged: Vec<ChangedPath>,
    },

    /// A patch could not be applied; the apply session is left in place.
    #[error(
        "failed to apply patch {patch} ({position}/{total}); earlier patches are committed.\n\
         Resolve the conflict and run `git am --continue`, or `git am --abort` to discard the session"
    )]
    PatchApplyConflict {
        patch: PatchName,
        /// 1-based position in the list
        position: usize,
        total: usize,
    },

    /// Listed patches without a file; checked before touching the repository.
    #[error("patch list references missing files:\n{}", render_paths(.paths))]
    MissingPatchFile { paths: Vec<PathBuf> },

    /// The apply session stopped at a position outside the patch list.
    #[error("apply session stopped at position {position} of a {total}-patch list")]
    UnexpectedSessionPosition { position: usize, total: usize },

    #[error(transparent)]
    PatchSet(#[from] PatchSetError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}

fn render_changes(label: &str, changes: &[ChangedPath]) -> String {
    if changes.is_empty() {
        return String::new();
    }
    format!("\n{label} changes:\n{}", format_list(changes, "  "))
}

fn render_paths(paths: &[PathBuf]) -> String {
    let shown: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
    format_list(&shown, "  ")
}

/// Subject line of the commit the current reference points at.
///
/// # Example
///
/// ```
/// use patchstack::engine::head_commit_message;
/// use patchstack::git::mock::MockVcs;
///
/// let vcs = MockVcs::new("/work/CraftBukkit").with_head_summary("Update to 1.7.2");
/// assert_eq!(head_commit_message(&vcs).unwrap(), "Update to 1.7.2");
/// ```
pub fn head_commit_message<V: VersionControl>(vcs: &V) -> Result<String, EngineError> {
    Ok(vcs.head_commit()?.summary)
}
