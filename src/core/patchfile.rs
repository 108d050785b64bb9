//! core::patchfile
//!
//! Naming and content normalization for exported patch files.
//!
//! `git format-patch` names each file `NNNN-<slug>.patch` and writes content
//! that differs between exports of the same change: a leading
//! `From <sha> <date>` mbox separator and `index <sha>..<sha> <mode>` lines.
//! Both are dropped so regenerating an unchanged stack yields byte-identical
//! patch files.

use std::sync::LazyLock;

use regex::Regex;

static EXPORTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(.+)\.patch$").expect("valid regex"));

static PROVENANCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^From [0-9a-fA-F]+ ").expect("valid regex"));

static INDEX_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^index [0-9a-fA-F]+\.\.[0-9a-fA-F]+ [0-7]+\s*$").expect("valid regex")
});

/// Extract the slug from an exported file name.
///
/// Returns `None` if the name does not follow `<4 digits>-<slug>.patch`.
///
/// # Example
///
/// ```
/// use patchstack::core::patchfile::exported_slug;
///
/// assert_eq!(exported_slug("0001-Add-hooks.patch"), Some("Add-hooks"));
/// assert_eq!(exported_slug("Add-hooks.patch"), None);
/// assert_eq!(exported_slug("01-Add-hooks.patch"), None);
/// ```
pub fn exported_slug(file_name: &str) -> Option<&str> {
    EXPORTED_NAME
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// True if `line` is a `From <sha> ...` mbox provenance marker.
pub fn is_provenance_line(line: &str) -> bool {
    PROVENANCE_LINE.is_match(line)
}

/// True if `line` is an `index <sha>..<sha> <mode>` header.
///
/// Index lines without a mode (new, deleted or mode-changed files) are not
/// matched; git needs them to recreate the file.
pub fn is_index_line(line: &str) -> bool {
    INDEX_LINE.is_match(line.trim_end_matches(['\r', '\n']))
}

/// Strip non-deterministic lines from exported patch content.
///
/// Line endings of the kept lines are preserved exactly.
///
/// # Example
///
/// ```
/// use patchstack::core::patchfile::normalize;
///
/// let exported = "From 1a2b3c Mon Sep 17 00:00:00 2001\n\
///                 Subject: [PATCH] Fix\n\
///                 index 1a2b3c4..5d6e7f8 100644\n\
///                 --- a/x\n";
/// assert_eq!(normalize(exported), "Subject: [PATCH] Fix\n--- a/x\n");
/// ```
pub fn normalize(content: &str) -> String {
    let mut lines = content.split_inclusive('\n').peekable();

    if lines.peek().is_some_and(|first| is_provenance_line(first)) {
        lines.next();
    }

    lines.filter(|line| !is_index_line(line)).collect()
}
