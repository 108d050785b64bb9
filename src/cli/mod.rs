//! cli
//!
//! Command-line interface layer for pstack.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve paths and configuration defaults
//! - Delegate to command handlers, which call the [`crate::engine`]
//!
//! # Architecture
//!
//! The CLI layer is thin. Library layers return typed errors; handlers
//! attach context with `anyhow` and `main` prints the chain.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::output::{Reporter, Verbosity};

/// Execution context built from global flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override (`--cwd`)
    pub cwd: Option<PathBuf>,
    pub debug: bool,
    pub quiet: bool,
}

impl Context {
    /// Directory relative paths resolve against.
    pub fn work_dir(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    /// Resolve `path` against the working directory.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.work_dir()?.join(path))
        }
    }

    pub fn reporter(&self) -> Reporter {
        Reporter::new(Verbosity::from_flags(self.quiet, self.debug))
    }

    /// Load global and project configuration for the working directory.
    pub fn config(&self) -> Result<Config> {
        let dir = self.work_dir()?;
        let config = Config::load(Some(&dir)).context("Failed to load configuration")?;
        for source in config.sources() {
            self.reporter()
                .debug(format!("loaded config from {}", source.display()));
        }
        Ok(config)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_relative_paths() {
        let ctx = Context {
            cwd: Some(PathBuf::from("/work")),
            ..Context::default()
        };
        assert_eq!(
            ctx.resolve(Path::new("Bukkit")).unwrap(),
            PathBuf::from("/work/Bukkit")
        );
        assert_eq!(
            ctx.resolve(Path::new("/abs/dir")).unwrap(),
            PathBuf::from("/abs/dir")
        );
    }

    #[test]
    fn reporter_follows_flags() {
        let ctx = Context {
            quiet: true,
            debug: true,
            ..Context::default()
        };
        assert_eq!(ctx.reporter().verbosity(), Verbosity::Quiet);
    }
}
