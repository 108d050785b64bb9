//! engine::guard
//!
//! Clean-tree precondition for destructive operations.

use super::EngineError;
use crate::git::VersionControl;
use crate::ui::output::Reporter;

/// Fail with [`EngineError::DirtyWorkTree`] unless the tree and index are
/// clean. With `force`, returns immediately without checking.
///
/// The index is refreshed first so files whose stat data changed but whose
/// content did not are not reported. Submodules are ignored. Both unstaged
/// and staged changes are collected before failing; nothing is modified.
///
/// # Example
///
/// ```
/// use patchstack::engine::{assert_clean_work_tree, EngineError};
/// use patchstack::git::mock::MockVcs;
/// use patchstack::git::ChangedPath;
/// use patchstack::ui::output::Reporter;
///
/// let vcs = MockVcs::new("/work/Bukkit").with_unstaged(ChangedPath::new('M', "pom.xml"));
/// let out = Reporter::quiet();
///
/// assert!(matches!(
///     assert_clean_work_tree(&vcs, false, &out),
///     Err(EngineError::DirtyWorkTree { .. })
/// ));
/// assert!(assert_clean_work_tree(&vcs, true, &out).is_ok());
/// ```
pub fn assert_clean_work_tree<V: VersionControl>(
    vcs: &V,
    force: bool,
    out: &Reporter,
) -> Result<(), EngineError> {
    if force {
        out.debug("skipping clean-tree check (forced)");
        return Ok(());
    }

    vcs.refresh_index()?;
    let unstaged = vcs.unstaged_changes()?;
    let staged = vcs.staged_changes()?;

    if unstaged.is_empty() && staged.is_empty() {
        out.debug(format!("{} is clean", vcs.root().display()));
        return Ok(());
    }

    Err(EngineError::DirtyWorkTree { unstaged, staged })
}
