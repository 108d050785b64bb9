//! download command - Checksum-verified cached download

use std::path::Path;

use anyhow::Result;

use crate::cli::Context;
use crate::fetch;

pub fn download(ctx: &Context, file: &Path, url: &str, sha256: &str) -> Result<()> {
    let file = ctx.resolve(file)?;
    fetch::download(&file, url, sha256, &ctx.reporter())?;
    Ok(())
}
