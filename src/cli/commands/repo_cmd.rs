//! repository commands - init, clone, submodule, branch, remote-add, reset, head

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::types::{BranchName, RemoteName, RemoteRef};
use crate::engine::{self, sync};
use crate::git::Git;

/// Create a repository at `path` unless one exists.
pub fn init(ctx: &Context, path: &Path) -> Result<()> {
    let git = Git::at(ctx.resolve(path)?);
    let out = ctx.reporter();
    if !sync::init(&git, &out)? {
        out.info(format!("{} is already a repository", path.display()));
    }
    Ok(())
}

/// Clone `source` into `dest` unless `dest` already has a repository.
pub fn clone(ctx: &Context, source: &str, dest: &Path) -> Result<()> {
    let git = Git::at(ctx.resolve(dest)?);
    let out = ctx.reporter();
    let cloned = sync::clone(&git, source, &out)
        .with_context(|| format!("Failed to clone {source}"))?;
    if !cloned {
        out.info(format!("{} already exists", dest.display()));
    }
    Ok(())
}

pub fn submodule(ctx: &Context, repo: &Path, path: &Path) -> Result<()> {
    let git = Git::at(ctx.resolve(repo)?);
    sync::submodule_update(&git, path, &ctx.reporter())
        .with_context(|| format!("Failed to update submodule {}", path.display()))?;
    Ok(())
}

pub fn branch(ctx: &Context, repo: &Path, name: &str) -> Result<()> {
    let name = BranchName::new(name)?;
    let git = Git::at(ctx.resolve(repo)?);
    sync::branch(&git, &name, &ctx.reporter())?;
    Ok(())
}

pub fn remote_add(ctx: &Context, repo: &Path, name: &str, url: &str) -> Result<()> {
    let name = RemoteName::new(name)?;
    let git = Git::at(ctx.resolve(repo)?);
    let out = ctx.reporter();
    if !sync::remote_add(&git, &name, url, &out)? {
        out.info(format!("Remote {name} already exists"));
    }
    Ok(())
}

/// Fetch `branch` from `remote` (or the configured remote) and hard-reset.
pub fn reset(ctx: &Context, repo: &Path, remote: Option<&str>, branch: &str) -> Result<()> {
    let config = ctx.config()?;
    let remote = RemoteName::new(remote.unwrap_or(config.remote()))?;
    let target = RemoteRef::new(remote, BranchName::new(branch)?);

    let git = Git::at(ctx.resolve(repo)?);
    sync::reset(&git, &target, &ctx.reporter())
        .with_context(|| format!("Failed to reset {} to {}", repo.display(), target))?;
    Ok(())
}

/// Print the subject line of the HEAD commit.
pub fn head(ctx: &Context, repo: &Path) -> Result<()> {
    let git = Git::at(ctx.resolve(repo)?);
    let message = engine::head_commit_message(&git).context("Failed to read HEAD commit")?;
    println!("{message}");
    Ok(())
}
