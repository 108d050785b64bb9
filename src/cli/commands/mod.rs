//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves paths and fills defaults from configuration
//! 2. Calls the engine (or a collaborator) to do the work
//! 3. Formats and displays output
//!
//! Handlers do NOT talk to git directly.

mod build;
mod completion;
mod download;
mod export;
mod patches;
mod repo_cmd;

pub use build::build;
pub use completion::completion;
pub use download::download;
pub use export::export;
pub use patches::{apply, check, generate};
pub use repo_cmd::{branch, clone, head, init, remote_add, reset, submodule};

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        // Repository bootstrap and sync
        Command::Init { path } => repo_cmd::init(ctx, &path),
        Command::Clone { source, dest } => repo_cmd::clone(ctx, &source, &dest),
        Command::Submodule { path, repo } => repo_cmd::submodule(ctx, &repo.repo, &path),
        Command::Branch { name, repo } => repo_cmd::branch(ctx, &repo.repo, &name),
        Command::RemoteAdd { name, url, repo } => repo_cmd::remote_add(ctx, &repo.repo, &name, &url),
        Command::Reset {
            branch,
            remote,
            repo,
        } => repo_cmd::reset(ctx, &repo.repo, remote.as_deref(), &branch),
        Command::Head { repo } => repo_cmd::head(ctx, &repo.repo),

        // Patch stack
        Command::Apply {
            repo,
            patches,
            force,
        } => patches::apply(ctx, &repo.repo, &patches, force),
        Command::Check { repo, force } => patches::check(ctx, &repo.repo, force),
        Command::Generate {
            from_ref,
            repo,
            patches,
            json,
        } => patches::generate(ctx, &repo.repo, &from_ref, &patches, json),
        Command::Export { from, to } => export::export(ctx, &from, &to),

        // Collaborators
        Command::Download { file, url, sha256 } => download::download(ctx, &file, &url, &sha256),
        Command::Build { dir, args } => build::build(ctx, &dir, &args),
        Command::Completion { shell } => completion::completion(shell),
    }
}
