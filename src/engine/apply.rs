//! engine::apply
//!
//! Apply a named, ordered patch set to a repository.
//!
//! # Outcome
//!
//! A run either commits all N patches in list order, or stops at patch k
//! with [`EngineError::PatchApplyConflict`]: patches 1..k-1 are committed,
//! k..N are not attempted, and the apply session stays in place so the
//! conflict can be inspected with ordinary git tooling.

use std::path::{Path, PathBuf};

use super::EngineError;
use crate::core::patchset::PatchSet;
use crate::git::{ApplyOutcome, VersionControl};
use crate::ui::output::Reporter;

/// Apply the patches listed in `list` from `dir`, one commit each.
///
/// Before applying, any stale apply session is aborted and untracked
/// files are removed (ignored files are kept). An empty list is a no-op.
///
/// Returns the number of patches committed.
///
/// # Errors
///
/// - [`EngineError::MissingPatchFile`] if a listed patch has no file;
///   raised before the repository is touched
/// - [`EngineError::PatchApplyConflict`] if a patch does not apply
pub fn apply_patches<V: VersionControl>(
    vcs: &V,
    dir: &Path,
    list: &Path,
    out: &Reporter,
) -> Result<usize, EngineError> {
    let set = PatchSet::load(dir, list)?;
    if set.is_empty() {
        out.info(format!("No patches listed in {}", list.display()));
        return Ok(0);
    }

    let missing = set.missing_files();
    if !missing.is_empty() {
        return Err(EngineError::MissingPatchFile { paths: missing });
    }

    // git runs inside the repository root, so relative paths would not
    // resolve against the caller's directory.
    let paths = set
        .paths()
        .into_iter()
        .map(|path| path.canonicalize().map_err(|e| EngineError::io(&path, e)))
        .collect::<Result<Vec<PathBuf>, _>>()?;

    let state = vcs.state()?;
    if state.is_apply_session() {
        out.warn(format!("Aborting stale apply session ({state})"));
        vcs.abort_mailbox()?;
    }

    for removed in vcs.clean_untracked()? {
        out.debug(format!("removed untracked {}", removed.display()));
    }

    out.info(format!(
        "Applying {} patches to {}",
        set.len(),
        vcs.root().display()
    ));

    match vcs.apply_mailbox(&paths)? {
        ApplyOutcome::Applied { count } => {
            out.info(format!("Applied {count} patches"));
            let head = vcs.head_commit()?;
            out.debug(format!(
                "HEAD is now {} {}",
                head.oid.get(..10).unwrap_or(head.oid.as_str()),
                head.summary
            ));
            if head.committer_time != head.author_time {
                out.warn(format!(
                    "committer date of {} differs from its author date; rebuilt commits will not be reproducible",
                    head.oid
                ));
            }
            Ok(count)
        }
        ApplyOutcome::Conflict { index } => {
            let total = set.len();
            let patch = index
                .checked_sub(1)
                .and_then(|i| set.names().get(i))
                .cloned()
                .ok_or(EngineError::UnexpectedSessionPosition {
                    position: index,
                    total,
                })?;
            Err(EngineError::PatchApplyConflict {
                patch,
                position: index,
                total,
            })
        }
    }
}
