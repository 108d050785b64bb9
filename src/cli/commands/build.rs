//! build command - Run the configured build tool

use std::path::Path;

use anyhow::Result;

use crate::cli::Context;
use crate::tool;

/// Run the build tool from config, or Maven, in `dir`.
pub fn build(ctx: &Context, dir: &Path, args: &[String]) -> Result<()> {
    let config = ctx.config()?;
    let out = ctx.reporter();

    let tool = config
        .build_tool()
        .unwrap_or_else(tool::maven)
        .current_dir(ctx.resolve(dir)?);

    out.info(format!("Running {} {}", tool.program(), args.join(" ")));
    for (key, value) in tool.env_appends() {
        out.debug(format!("{key} += {value}"));
    }
    tool.run(args)?;
    Ok(())
}
