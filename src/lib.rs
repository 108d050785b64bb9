//! patchstack - Fetch, patch, and synchronize third-party source trees
//!
//! patchstack maintains an ordered stack of patches on top of an upstream
//! source tree: it bootstraps and hard-syncs working copies, applies a patch
//! set one commit per patch, regenerates the set from commit history, and
//! exports the patched tree for downstream builds.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Patch-stack operations: sync, guard, apply, generate, export
//! - [`core`] - Domain types, patch sets, patch file filtering, configuration
//! - [`git`] - Single interface for all Git operations
//! - [`fetch`] - Checksum-verified cached downloads
//! - [`tool`] - External build tool invocation
//! - [`ui`] - Leveled, colorized output
//!
//! # Correctness Invariants
//!
//! 1. Patch order in the list artifact is commit order on apply
//! 2. An apply run commits every patch or stops at the first failing one
//! 3. Destructive operations are gated on a clean working tree unless forced
//! 4. Regeneration replaces a patch set in full

pub mod cli;
pub mod core;
pub mod engine;
pub mod fetch;
pub mod git;
pub mod tool;
pub mod ui;
