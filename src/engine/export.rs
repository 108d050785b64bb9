//! engine::export
//!
//! Materialize the current commit's tree into a plain directory.

use std::fs;
use std::path::Path;

use super::EngineError;
use crate::git::VersionControl;
use crate::ui::output::Reporter;

/// Replace `to` with the tracked contents of the current commit.
///
/// `to` is deleted if it exists and recreated. Uncommitted and untracked
/// state of the working copy is never copied.
pub fn export_tree<V: VersionControl>(
    vcs: &V,
    to: &Path,
    out: &Reporter,
) -> Result<(), EngineError> {
    if to.is_dir() {
        out.debug(format!("removing {}", to.display()));
        fs::remove_dir_all(to).map_err(|e| EngineError::io(to, e))?;
    } else if to.exists() {
        fs::remove_file(to).map_err(|e| EngineError::io(to, e))?;
    }
    fs::create_dir_all(to).map_err(|e| EngineError::io(to, e))?;

    out.info(format!(
        "Exporting {} to {}",
        vcs.root().display(),
        to.display()
    ));
    vcs.archive_to(to)?;
    Ok(())
}
