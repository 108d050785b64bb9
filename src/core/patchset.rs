//! core::patchset
//!
//! The on-disk patch set: a list artifact plus a directory of patch files.
//!
//! # Format
//!
//! The list artifact (conventionally `patches/series`) is UTF-8 text with one
//! patch name per line, in apply order. Blank lines are ignored on read and
//! surrounding whitespace is trimmed. Each name resolves to
//! `<dir>/<name>.patch`.
//!
//! # Invariants
//!
//! - Order is significant: it defines commit order on apply.
//! - Every listed name must resolve to an existing file before the set is
//!   handed to the applier ([`PatchSet::missing_files`]).
//! - Sets are written wholesale ([`write_list`]); nothing here edits an
//!   existing list in place.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{PatchName, TypeError};

/// Errors from reading or writing a patch set.
#[derive(Debug, Error)]
pub enum PatchSetError {
    #[error("failed to read patch list '{path}': {source}")]
    ReadList {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write patch list '{path}': {source}")]
    WriteList {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid entry on line {line} of patch list: {source}")]
    InvalidEntry { line: usize, source: TypeError },
}

/// An ordered, named sequence of patches rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSet {
    dir: PathBuf,
    names: Vec<PatchName>,
}

impl PatchSet {
    /// Build a patch set from already-parsed names.
    pub fn new(dir: impl Into<PathBuf>, names: Vec<PatchName>) -> Self {
        Self {
            dir: dir.into(),
            names,
        }
    }

    /// Read the list artifact at `list` and resolve names against `dir`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use patchstack::core::patchset::PatchSet;
    /// use std::path::Path;
    ///
    /// let set = PatchSet::load(Path::new("patches"), Path::new("patches/series")).unwrap();
    /// for path in set.paths() {
    ///     println!("{}", path.display());
    /// }
    /// ```
    pub fn load(dir: &Path, list: &Path) -> Result<Self, PatchSetError> {
        let contents = fs::read_to_string(list).map_err(|source| PatchSetError::ReadList {
            path: list.to_path_buf(),
            source,
        })?;
        Ok(Self::new(dir, parse_list(&contents)?))
    }

    /// Directory holding the patch files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Patch names in apply order.
    pub fn names(&self) -> &[PatchName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Path of the file holding `name`.
    pub fn patch_path(&self, name: &PatchName) -> PathBuf {
        self.dir.join(name.file_name())
    }

    /// Patch file paths in apply order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.names.iter().map(|name| self.patch_path(name)).collect()
    }

    /// Listed patches whose file does not exist.
    pub fn missing_files(&self) -> Vec<PathBuf> {
        self.paths().into_iter().filter(|p| !p.is_file()).collect()
    }
}

/// Parse list artifact contents into patch names.
///
/// Blank lines are skipped; line numbers in errors are 1-based and count
/// blank lines.
///
/// # Example
///
/// ```
/// use patchstack::core::patchset::parse_list;
///
/// let names = parse_list("First\n\n  Second  \n").unwrap();
/// let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
/// assert_eq!(names, ["First", "Second"]);
/// ```
pub fn parse_list(contents: &str) -> Result<Vec<PatchName>, PatchSetError> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line, name)| {
            PatchName::new(name).map_err(|source| PatchSetError::InvalidEntry { line, source })
        })
        .collect()
}

/// Render patch names as list artifact contents.
pub fn render_list(names: &[PatchName]) -> String {
    let mut out = String::new();
    for name in names {
        out.push_str(name.as_str());
        out.push('\n');
    }
    out
}

/// Write the list artifact in full, creating its parent directory.
pub fn write_list(list: &Path, names: &[PatchName]) -> Result<(), PatchSetError> {
    let write_err = |source| PatchSetError::WriteList {
        path: list.to_path_buf(),
        source,
    };

    if let Some(parent) = list.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(list, render_list(names)).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(raw: &[&str]) -> Vec<PatchName> {
        raw.iter().map(|n| PatchName::new(*n).unwrap()).collect()
    }

    #[test]
    fn parse_skips_blank_lines() {
        let parsed = parse_list("\nA\n   \nB\r\n\nC").unwrap();
        assert_eq!(parsed, names(&["A", "B", "C"]));
    }

    #[test]
    fn parse_empty_list() {
        assert!(parse_list("").unwrap().is_empty());
        assert!(parse_list("\n\n").unwrap().is_empty());
    }

    #[test]
    fn parse_reports_line_of_bad_entry() {
        let err = parse_list("Good\n\nbad/name\n").unwrap_err();
        match err {
            PatchSetError::InvalidEntry { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn render_is_one_name_per_line() {
        assert_eq!(render_list(&names(&["A", "B"])), "A\nB\n");
        assert_eq!(render_list(&[]), "");
    }

    #[test]
    fn paths_follow_list_order() {
        let set = PatchSet::new("/p", names(&["C", "A", "B"]));
        assert_eq!(
            set.paths(),
            vec![
                PathBuf::from("/p/C.patch"),
                PathBuf::from("/p/A.patch"),
                PathBuf::from("/p/B.patch"),
            ]
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn load_and_detect_missing_files() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("series");
        fs::write(&list, "Present\nAbsent\n").unwrap();
        fs::write(dir.path().join("Present.patch"), "diff").unwrap();

        let set = PatchSet::load(dir.path(), &list).unwrap();
        assert_eq!(set.names(), names(&["Present", "Absent"]).as_slice());
        assert_eq!(set.missing_files(), vec![dir.path().join("Absent.patch")]);
    }

    #[test]
    fn load_missing_list_fails() {
        let dir = TempDir::new().unwrap();
        let err = PatchSet::load(dir.path(), &dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, PatchSetError::ReadList { .. }));
    }

    #[test]
    fn write_list_replaces_contents_and_creates_parent() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("nested/series");

        write_list(&list, &names(&["Old-one", "Old-two"])).unwrap();
        write_list(&list, &names(&["New"])).unwrap();

        assert_eq!(fs::read_to_string(&list).unwrap(), "New\n");
    }
}
