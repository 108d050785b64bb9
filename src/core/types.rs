//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`PatchName`] - Filesystem-safe patch identifier (a commit subject slug)
//! - [`BranchName`] - Validated Git branch name
//! - [`RemoteName`] - Validated Git remote name
//! - [`RemoteRef`] - A branch on a remote plus its explicit tracking ref
//!
//! # Validation
//!
//! These types enforce validity at construction time. A `PatchName` can
//! always be joined onto a patch directory without escaping it, and a
//! `RemoteRef` always produces a fully qualified refspec.
//!
//! # Examples
//!
//! ```
//! use patchstack::core::types::{BranchName, PatchName, RemoteName, RemoteRef};
//!
//! let name = PatchName::new("Fix-build-on-macOS").unwrap();
//! assert_eq!(name.file_name(), "Fix-build-on-macOS.patch");
//!
//! let target = RemoteRef::new(
//!     RemoteName::new("upstream").unwrap(),
//!     BranchName::new("main").unwrap(),
//! );
//! assert_eq!(target.tracking_ref(), "refs/remotes/upstream/main");
//!
//! assert!(PatchName::new("../escape").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File extension carried by every patch file in a patch set.
pub const PATCH_EXTENSION: &str = "patch";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid patch name: {0}")]
    InvalidPatchName(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid remote name: {0}")]
    InvalidRemoteName(String),
}

/// A validated patch name.
///
/// Patch names are the hash-independent identity of a patch inside a patch
/// set. They are derived from commit subjects by `git format-patch` and
/// must stay usable as a single path component:
/// - Cannot be empty, `.` or `..`
/// - Cannot contain `/`, `\` or control characters
/// - Cannot have leading or trailing whitespace
///
/// # Example
///
/// ```
/// use patchstack::core::types::PatchName;
///
/// let name = PatchName::new("Add-plugin-hooks").unwrap();
/// assert_eq!(name.as_str(), "Add-plugin-hooks");
///
/// assert!(PatchName::new("").is_err());
/// assert!(PatchName::new("a/b").is_err());
/// assert!(PatchName::new("..").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatchName(String);

impl PatchName {
    /// Create a new validated patch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPatchName` if the name is not a safe
    /// single path component.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidPatchName(
                "patch name cannot be empty".into(),
            ));
        }
        if name == "." || name == ".." {
            return Err(TypeError::InvalidPatchName(format!(
                "patch name cannot be '{name}'"
            )));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(TypeError::InvalidPatchName(format!(
                "patch name cannot contain path separators: {name}"
            )));
        }
        if name.chars().any(|c| c.is_control()) {
            return Err(TypeError::InvalidPatchName(
                "patch name cannot contain control characters".into(),
            ));
        }
        if name.trim() != name {
            return Err(TypeError::InvalidPatchName(format!(
                "patch name cannot have surrounding whitespace: '{name}'"
            )));
        }
        Ok(())
    }

    /// Get the patch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file name of this patch inside its patch directory.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, PATCH_EXTENSION)
    }
}

impl TryFrom<String> for PatchName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PatchName> for String {
    fn from(name: PatchName) -> Self {
        name.0
    }
}

impl AsRef<str> for PatchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git branch name.
///
/// Follows the subset of `git check-ref-format` rules that matter for
/// branches we create or fetch:
/// - Cannot be empty or exactly `@`
/// - Cannot start with `.`, `-` or `/`, or end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, spaces, control characters,
///   or any of `~ ^ : \ ? * [`
///
/// # Example
///
/// ```
/// use patchstack::core::types::BranchName;
///
/// assert!(BranchName::new("release/1.2").is_ok());
/// assert!(BranchName::new("bad..name").is_err());
/// assert!(BranchName::new("-rf").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let fail = |msg: &str| Err(TypeError::InvalidBranchName(format!("{msg}: {name}")));

        if name.is_empty() {
            return fail("branch name cannot be empty");
        }
        if name == "@" {
            return fail("branch name cannot be '@'");
        }
        if name.starts_with('.') || name.starts_with('-') || name.starts_with('/') {
            return fail("branch name has an invalid first character");
        }
        if name.ends_with(".lock") || name.ends_with('/') {
            return fail("branch name has an invalid ending");
        }
        if name.contains("..") || name.contains("@{") || name.contains("//") {
            return fail("branch name contains a forbidden sequence");
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        if name
            .chars()
            .any(|c| INVALID_CHARS.contains(&c) || c.is_ascii_control())
        {
            return fail("branch name contains a forbidden character");
        }

        if name
            .split('/')
            .any(|component| component.starts_with('.') || component.ends_with(".lock"))
        {
            return fail("branch name has an invalid path component");
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fully qualified local ref for this branch.
    pub fn local_ref(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git remote name.
///
/// Remote names become a path component of `refs/remotes/<remote>/...`,
/// so they follow the same character rules as a single branch component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteName(String);

impl RemoteName {
    /// Create a new validated remote name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.contains('/') {
            return Err(TypeError::InvalidRemoteName(format!(
                "remote name cannot contain '/': {name}"
            )));
        }
        BranchName::validate(&name)
            .map_err(|_| TypeError::InvalidRemoteName(format!("not a valid remote: {name}")))?;
        Ok(Self(name))
    }

    /// Get the remote name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RemoteName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemoteName> for String {
    fn from(name: RemoteName) -> Self {
        name.0
    }
}

impl fmt::Display for RemoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A branch on a named remote.
///
/// Fetching always uses an explicit refspec with a fully qualified
/// destination, so the result never depends on the remote's configured
/// fetch refspecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub remote: RemoteName,
    pub branch: BranchName,
}

impl RemoteRef {
    pub fn new(remote: RemoteName, branch: BranchName) -> Self {
        Self { remote, branch }
    }

    /// Remote-tracking ref that receives the fetched branch.
    pub fn tracking_ref(&self) -> String {
        format!("refs/remotes/{}/{}", self.remote, self.branch)
    }

    /// Forced refspec mapping the remote branch onto [`Self::tracking_ref`].
    pub fn refspec(&self) -> String {
        format!("+{}:{}", self.branch.local_ref(), self.tracking_ref())
    }
}

impl fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}
