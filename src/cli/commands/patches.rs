//! patch stack commands - apply, check, generate

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::args::PatchSetArgs;
use crate::cli::Context;
use crate::engine;
use crate::git::Git;
use crate::ui::output::Reporter;

/// Patch directory and list artifact, with configured defaults.
fn locate(ctx: &Context, args: &PatchSetArgs) -> Result<(PathBuf, PathBuf)> {
    let config = ctx.config()?;
    let dir = args.dir.clone().unwrap_or_else(|| config.patches_dir());
    let list = args.list.clone().unwrap_or_else(|| config.series_file());
    Ok((ctx.resolve(&dir)?, ctx.resolve(&list)?))
}

/// Check the working tree, then apply the patch set.
pub fn apply(ctx: &Context, repo: &Path, args: &PatchSetArgs, force: bool) -> Result<()> {
    let (dir, list) = locate(ctx, args)?;
    let git = Git::at(ctx.resolve(repo)?);
    let out = ctx.reporter();

    engine::assert_clean_work_tree(&git, force, &out)?;
    engine::apply_patches(&git, &dir, &list, &out)?;
    Ok(())
}

pub fn check(ctx: &Context, repo: &Path, force: bool) -> Result<()> {
    let git = Git::at(ctx.resolve(repo)?);
    let out = ctx.reporter();
    engine::assert_clean_work_tree(&git, force, &out)?;
    out.info("Working tree is clean");
    Ok(())
}

pub fn generate(
    ctx: &Context,
    repo: &Path,
    from_ref: &str,
    args: &PatchSetArgs,
    json: bool,
) -> Result<()> {
    let (dir, list) = locate(ctx, args)?;
    let git = Git::at(ctx.resolve(repo)?);

    // JSON output owns stdout.
    let out = if json {
        Reporter::quiet()
    } else {
        ctx.reporter()
    };

    let generated = engine::generate_patches(&git, from_ref, &dir, &list, &out)
        .with_context(|| format!("Failed to generate patches from {from_ref}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&generated)?);
    }
    Ok(())
}
