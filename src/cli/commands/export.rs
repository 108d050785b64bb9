//! export command - Write a repository's HEAD tree into a directory

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::engine;
use crate::git::Git;

pub fn export(ctx: &Context, from: &Path, to: &Path) -> Result<()> {
    let git = Git::at(ctx.resolve(from)?);
    let to = ctx.resolve(to)?;
    engine::export_tree(&git, &to, &ctx.reporter())
        .with_context(|| format!("Failed to export {} to {}", from.display(), to.display()))?;
    Ok(())
}
