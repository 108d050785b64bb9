//! engine::sync
//!
//! Idempotent repository bootstrap and hard synchronization to a remote
//! branch.
//!
//! Bootstrap operations check before they mutate: `init` and `clone` do
//! nothing when a repository already exists, `remote_add` does nothing when
//! the remote is registered, `branch` only creates a missing branch.
//! `reset` is deliberately destructive and discards local modifications.

use std::path::Path;

use super::EngineError;
use crate::core::types::{BranchName, RemoteName, RemoteRef};
use crate::git::VersionControl;
use crate::ui::output::Reporter;

/// True when the working copy has no repository yet.
pub fn needs_bootstrap<V: VersionControl>(vcs: &V) -> bool {
    !vcs.is_repo()
}

/// Create a repository at the bound root unless one exists.
///
/// Returns `true` if a repository was created.
pub fn init<V: VersionControl>(vcs: &V, out: &Reporter) -> Result<bool, EngineError> {
    if !needs_bootstrap(vcs) {
        out.debug(format!("{} is already a repository", vcs.root().display()));
        return Ok(false);
    }
    out.info(format!("Initializing repository in {}", vcs.root().display()));
    vcs.init()?;
    Ok(true)
}

/// Clone `source` into the bound root unless a repository exists there.
///
/// Returns `true` if a clone was made.
pub fn clone<V: VersionControl>(vcs: &V, source: &str, out: &Reporter) -> Result<bool, EngineError> {
    if !needs_bootstrap(vcs) {
        out.debug(format!(
            "{} already exists, not cloning {}",
            vcs.root().display(),
            source
        ));
        return Ok(false);
    }
    out.info(format!("Cloning {} into {}", source, vcs.root().display()));
    vcs.clone_from(source)?;
    Ok(true)
}

/// Initialize and check out the submodule at `path`.
pub fn submodule_update<V: VersionControl>(
    vcs: &V,
    path: &Path,
    out: &Reporter,
) -> Result<(), EngineError> {
    out.info(format!("Updating submodule {}", path.display()));
    vcs.submodule_update(path)?;
    Ok(())
}

/// Register `remote` unless a remote of that name exists.
///
/// The URL of an existing remote is left unchanged. Returns `true` if the
/// remote was added.
pub fn remote_add<V: VersionControl>(
    vcs: &V,
    remote: &RemoteName,
    url: &str,
    out: &Reporter,
) -> Result<bool, EngineError> {
    if vcs.remotes()?.iter().any(|name| name == remote.as_str()) {
        out.debug(format!("remote {remote} already registered"));
        return Ok(false);
    }
    out.info(format!("Adding remote {remote} -> {url}"));
    vcs.add_remote(remote.as_str(), url)?;
    Ok(true)
}

/// Check out `name`, creating it at the current commit if missing.
///
/// Returns `true` if the branch was created.
pub fn branch<V: VersionControl>(
    vcs: &V,
    name: &BranchName,
    out: &Reporter,
) -> Result<bool, EngineError> {
    let created = if vcs.branch_exists(name)? {
        false
    } else {
        out.debug(format!("creating branch {name}"));
        vcs.create_branch(name)?;
        true
    };
    out.info(format!("Switching to branch {name}"));
    vcs.checkout(name)?;
    Ok(created)
}

/// Fetch `target` and force the index and worktree to match it.
///
/// The reset only runs once the fetch has succeeded.
///
/// # Example
///
/// ```
/// use patchstack::core::types::{BranchName, RemoteName, RemoteRef};
/// use patchstack::engine::sync::reset;
/// use patchstack::git::mock::{MockOperation, MockVcs};
/// use patchstack::ui::output::Reporter;
///
/// let vcs = MockVcs::new("/work/Bukkit")
///     .with_remote("upstream", "https://example.com/bukkit.git")
///     .with_remote_branch("upstream", "master");
/// let target = RemoteRef::new(
///     RemoteName::new("upstream").unwrap(),
///     BranchName::new("master").unwrap(),
/// );
///
/// reset(&vcs, &target, &Reporter::quiet()).unwrap();
/// assert_eq!(
///     vcs.operations().last(),
///     Some(&MockOperation::HardReset { refname: "refs/remotes/upstream/master".into() })
/// );
/// ```
pub fn reset<V: VersionControl>(
    vcs: &V,
    target: &RemoteRef,
    out: &Reporter,
) -> Result<(), EngineError> {
    out.info(format!("Fetching {target}"));
    vcs.fetch(target)?;

    let tracking = target.tracking_ref();
    out.info(format!("Resetting {} to {}", vcs.root().display(), tracking));
    vcs.hard_reset(&tracking)?;
    Ok(())
}
