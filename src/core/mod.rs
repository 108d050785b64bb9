//! core
//!
//! Core domain types, schemas, and file formats for patchstack.
//!
//! # Modules
//!
//! - [`types`] - Strong types: PatchName, BranchName, RemoteName, RemoteRef
//! - [`patchset`] - List artifact parsing and writing
//! - [`patchfile`] - Exported patch naming and content filtering
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at construction time
//! - Schemas are strict and self-describing
//! - Nothing here touches a repository

pub mod config;
pub mod patchfile;
pub mod patchset;
pub mod types;
