//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Leveled, colorized output lines and verbosity handling

pub mod output;
