//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only
//!
//! Relative paths given to any command resolve against the working
//! directory (`--cwd` if set).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pstack - Fetch, patch, and synchronize third-party source trees
#[derive(Parser, Debug)]
#[command(name = "pstack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if pstack was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Arguments shared by commands that operate on one working copy.
#[derive(clap::Args, Debug, Clone)]
pub struct RepoArg {
    /// Working copy to operate on
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,
}

/// Patch set location; defaults come from `patchstack.toml`.
#[derive(clap::Args, Debug, Clone)]
pub struct PatchSetArgs {
    /// Directory holding `<name>.patch` files [default: patches]
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// List artifact naming patches in apply order [default: patches/series]
    #[arg(long, value_name = "FILE")]
    pub list: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a repository unless one exists
    Init {
        /// Directory to initialize
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Clone a repository unless the destination already has one
    Clone {
        /// URL or path to clone from
        source: String,
        /// Destination directory
        dest: PathBuf,
    },

    /// Initialize and check out a submodule
    Submodule {
        /// Submodule path, relative to the repository
        path: PathBuf,
        #[command(flatten)]
        repo: RepoArg,
    },

    /// Check out a branch, creating it at HEAD if missing
    Branch {
        name: String,
        #[command(flatten)]
        repo: RepoArg,
    },

    /// Add a remote unless one with that name exists
    #[command(name = "remote-add")]
    RemoteAdd {
        name: String,
        url: String,
        #[command(flatten)]
        repo: RepoArg,
    },

    /// Fetch a remote branch and hard-reset the working copy to it
    #[command(
        long_about = "Fetch a remote branch and hard-reset the working copy to it.\n\n\
            The branch is fetched into refs/remotes/<remote>/<branch> with an \
            explicit refspec, then the index and working tree are forced to match \
            it. Local modifications are discarded. Nothing is reset if the fetch fails."
    )]
    Reset {
        /// Branch to synchronize to
        branch: String,
        /// Remote to fetch from [default: configured remote, or origin]
        #[arg(long)]
        remote: Option<String>,
        #[command(flatten)]
        repo: RepoArg,
    },

    /// Apply the patch set, one commit per patch
    #[command(
        long_about = "Apply the patch set, one commit per patch.\n\n\
            Refuses to run on a working copy with uncommitted changes unless \
            --force is given. Untracked files are removed first. If a patch \
            does not apply, later patches are not attempted and the apply \
            session is left in place for inspection.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Sync to upstream, then apply
    pstack reset master --remote upstream --repo Bukkit
    pstack apply --repo Bukkit --dir Bukkit-Patches --list Bukkit-Patches/series

    # After a conflict: resolve, then continue with git
    git -C Bukkit am --continue"
    )]
    Apply {
        #[command(flatten)]
        repo: RepoArg,
        #[command(flatten)]
        patches: PatchSetArgs,
        /// Skip the clean working tree check
        #[arg(long)]
        force: bool,
    },

    /// Fail unless the working tree and index are clean
    Check {
        #[command(flatten)]
        repo: RepoArg,
        /// Skip the check
        #[arg(long)]
        force: bool,
    },

    /// Print the subject of the HEAD commit
    Head {
        #[command(flatten)]
        repo: RepoArg,
    },

    /// Regenerate the patch set from commits since a ref
    Generate {
        /// Base ref; commits reachable from HEAD but not from it are exported
        from_ref: String,
        #[command(flatten)]
        repo: RepoArg,
        #[command(flatten)]
        patches: PatchSetArgs,
        /// Print the generated set as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the HEAD tree of a repository into a fresh directory
    Export {
        /// Repository to export from
        from: PathBuf,
        /// Destination directory (replaced)
        to: PathBuf,
    },

    /// Download a file unless a copy with the expected checksum exists
    Download {
        /// Destination file
        file: PathBuf,
        url: String,
        /// Expected SHA-256 digest (hex)
        #[arg(long)]
        sha256: String,
    },

    /// Run the configured build tool (Maven by default)
    Build {
        /// Directory to run the build in
        #[arg(long, value_name = "PATH", default_value = ".")]
        dir: PathBuf,
        /// Arguments passed to the build tool
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    pstack completion bash > ~/.local/share/bash-completion/completions/pstack

    # Zsh
    pstack completion zsh > ~/.zfunc/_pstack

    # Fish
    pstack completion fish > ~/.config/fish/completions/pstack.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
