//! engine::generate
//!
//! Derive a patch set from a commit range.
//!
//! # Pipeline
//!
//! 1. Remove existing `*.patch` files from the patch directory
//! 2. Export `from_ref..HEAD` as one mailbox file per commit
//! 3. Read every `NNNN-<slug>.patch` export, then write each as
//!    `<slug>.patch`, stripping the provenance line and `index` headers
//!    ([`normalize`])
//! 4. Write the list artifact in export order
//!
//! Anomalies (unexpected exported names, duplicate slugs) are reported as
//! [`GenerateWarning`]s in the result and never abort the run.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::EngineError;
use crate::core::patchfile::{exported_slug, normalize};
use crate::core::patchset::write_list;
use crate::core::types::{PatchName, PATCH_EXTENSION};
use crate::git::VersionControl;
use crate::ui::output::Reporter;

/// Non-fatal anomaly found while generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerateWarning {
    /// An exported file did not match `NNNN-<slug>.patch`; it was left in
    /// place and not listed.
    UnexpectedPatchFilename { file: PathBuf },

    /// Two commits produced the same slug; the later one was renamed.
    DuplicatePatchName { name: PatchName, renamed: PatchName },
}

impl std::fmt::Display for GenerateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateWarning::UnexpectedPatchFilename { file } => {
                write!(f, "skipping unexpected patch file name: {}", file.display())
            }
            GenerateWarning::DuplicatePatchName { name, renamed } => {
                write!(f, "duplicate patch name {name}, saved as {renamed}")
            }
        }
    }
}

/// Result of [`generate_patches`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPatchSet {
    /// Patch names in list order.
    pub names: Vec<PatchName>,
    pub warnings: Vec<GenerateWarning>,
}

/// Regenerate the patch set in `dir` from the commits in `from_ref..HEAD`.
///
/// The list artifact at `list` is rewritten in full.
///
/// # Example
///
/// ```
/// use patchstack::engine::generate_patches;
/// use patchstack::git::mock::MockVcs;
/// use patchstack::ui::output::Reporter;
///
/// let tmp = tempfile::TempDir::new().unwrap();
/// let dir = tmp.path().join("patches");
/// let vcs = MockVcs::new("/work/CraftBukkit")
///     .with_export("0001-Add-hooks.patch", "From 1a2b Mon Sep 17 00:00:00 2001\nSubject: [PATCH] Add hooks\n");
///
/// let set = generate_patches(&vcs, "upstream/master", &dir, &dir.join("series"), &Reporter::quiet()).unwrap();
/// assert_eq!(set.names[0].as_str(), "Add-hooks");
/// assert_eq!(
///     std::fs::read_to_string(dir.join("Add-hooks.patch")).unwrap(),
///     "Subject: [PATCH] Add hooks\n"
/// );
/// ```
pub fn generate_patches<V: VersionControl>(
    vcs: &V,
    from_ref: &str,
    dir: &Path,
    list: &Path,
    out: &Reporter,
) -> Result<GeneratedPatchSet, EngineError> {
    fs::create_dir_all(dir).map_err(|e| EngineError::io(dir, e))?;
    for stale in existing_patches(dir)? {
        out.debug(format!("removing {}", stale.display()));
        fs::remove_file(&stale).map_err(|e| EngineError::io(&stale, e))?;
    }

    out.info(format!("Generating patches from {from_ref}..HEAD"));
    let exported = vcs.export_patches(from_ref, dir)?;

    // Every export is read and removed before any slug file is written:
    // a slug such as `0003-Baz` can name an export still waiting its turn.
    let mut pending = Vec::with_capacity(exported.len());
    let mut seen = HashSet::new();
    let mut warnings = Vec::new();

    for file in exported {
        let slug = file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(exported_slug)
            .and_then(|slug| PatchName::new(slug).ok());
        let Some(name) = slug else {
            // Left in place, so its name stays taken.
            if let Some(kept) = kept_name(&file) {
                seen.insert(kept);
            }
            let warning = GenerateWarning::UnexpectedPatchFilename { file };
            out.warn(&warning);
            warnings.push(warning);
            continue;
        };

        let content = fs::read_to_string(&file).map_err(|e| EngineError::io(&file, e))?;
        fs::remove_file(&file).map_err(|e| EngineError::io(&file, e))?;
        pending.push((name, content));
    }

    let mut names = Vec::with_capacity(pending.len());
    for (name, content) in pending {
        let name = if seen.contains(&name) {
            let renamed = disambiguate(&name, &seen);
            let warning = GenerateWarning::DuplicatePatchName {
                name,
                renamed: renamed.clone(),
            };
            out.warn(&warning);
            warnings.push(warning);
            renamed
        } else {
            name
        };

        let target = dir.join(name.file_name());
        fs::write(&target, normalize(&content)).map_err(|e| EngineError::io(&target, e))?;
        out.debug(format!("wrote {}", target.display()));

        seen.insert(name.clone());
        names.push(name);
    }

    write_list(list, &names)?;
    out.info(format!("Wrote {} patches to {}", names.len(), dir.display()));

    Ok(GeneratedPatchSet { names, warnings })
}

/// `*.patch` files directly inside `dir`.
fn existing_patches(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let entries = fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))?;
    let mut patches = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| EngineError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == PATCH_EXTENSION) {
            patches.push(path);
        }
    }
    patches.sort();
    Ok(patches)
}

/// Patch name a retained `<name>.patch` file occupies, if any.
fn kept_name(file: &Path) -> Option<PatchName> {
    if file.extension().is_some_and(|ext| ext == PATCH_EXTENSION) {
        let stem = file.file_stem()?.to_str()?;
        PatchName::new(stem).ok()
    } else {
        None
    }
}

/// First `<name>-N` (N >= 2) not already taken.
fn disambiguate(name: &PatchName, seen: &HashSet<PatchName>) -> PatchName {
    (2..)
        .filter_map(|n| PatchName::new(format!("{name}-{n}")).ok())
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{FailOn, MockOperation, MockVcs};
    use tempfile::TempDir;

    const ADD_HOOKS: &str = "\
From 8f14e45fceea167a5a36dedd4bea2543 Mon Sep 17 00:00:00 2001
From: Jane Doe <jane@example.com>
Subject: [PATCH] Add hooks

---
diff --git a/Hooks.java b/Hooks.java
index 3b18e51..a0b1c2d 100644
--- a/Hooks.java
+++ b/Hooks.java
@@ -1 +1,2 @@
 class Hooks {}
+// hooked
";

    fn layout() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("patches");
        let list = dir.join("series");
        (tmp, dir, list)
    }

    fn generate(vcs: &MockVcs, dir: &Path, list: &Path) -> GeneratedPatchSet {
        generate_patches(vcs, "upstream/master", dir, list, &Reporter::quiet()).unwrap()
    }

    mod naming {
        use super::*;

        #[test]
        fn strips_numeric_prefix_and_lists_in_order() {
            let (_tmp, dir, list) = layout();
            let vcs = MockVcs::new("/work")
                .with_export("0001-Zeta.patch", "Subject: Zeta\n")
                .with_export("0002-Alpha.patch", "Subject: Alpha\n");

            let set = generate(&vcs, &dir, &list);

            let names: Vec<_> = set.names.iter().map(PatchName::as_str).collect();
            assert_eq!(names, ["Zeta", "Alpha"]);
            assert_eq!(fs::read_to_string(&list).unwrap(), "Zeta\nAlpha\n");
            assert!(dir.join("Zeta.patch").is_file());
            assert!(!dir.join("0001-Zeta.patch").exists());
            assert!(set.warnings.is_empty());
        }

        #[test]
        fn unexpected_name_is_skipped_with_warning() {
            let (_tmp, dir, list) = layout();
            let vcs = MockVcs::new("/work")
                .with_export("0001-Good.patch", "Subject: Good\n")
                .with_export("weird.patch", "Subject: Weird\n")
                .with_export("0003-Also-good.patch", "Subject: Also good\n");

            let set = generate(&vcs, &dir, &list);

            let names: Vec<_> = set.names.iter().map(PatchName::as_str).collect();
            assert_eq!(names, ["Good", "Also-good"]);
            assert_eq!(
                set.warnings,
                vec![GenerateWarning::UnexpectedPatchFilename {
                    file: dir.join("weird.patch")
                }]
            );
            assert!(dir.join("weird.patch").exists());
        }

        #[test]
        fn duplicate_subjects_get_suffixes() {
            let (_tmp, dir, list) = layout();
            let vcs = MockVcs::new("/work")
                .with_export("0001-Fix.patch", "Subject: Fix 1\n")
                .with_export("0002-Fix.patch", "Subject: Fix 2\n")
                .with_export("0003-Fix.patch", "Subject: Fix 3\n");

            let set = generate(&vcs, &dir, &list);

            assert_eq!(fs::read_to_string(&list).unwrap(), "Fix\nFix-2\nFix-3\n");
            assert_eq!(
                fs::read_to_string(dir.join("Fix-2.patch")).unwrap(),
                "Subject: Fix 2\n"
            );
            assert_eq!(set.warnings.len(), 2);
        }

        #[test]
        fn numeric_subject_does_not_clobber_later_export() {
            let (_tmp, dir, list) = layout();
            let vcs = MockVcs::new("/work")
                .with_export("0001-Bar.patch", "Subject: Bar\n+b.txt\n")
                .with_export("0002-0003-Baz.patch", "Subject: 0003 Baz\n+a.txt\n")
                .with_export("0003-Baz.patch", "Subject: Baz\n+c.txt\n");

            let set = generate(&vcs, &dir, &list);

            let names: Vec<_> = set.names.iter().map(PatchName::as_str).collect();
            assert_eq!(names, ["Bar", "0003-Baz", "Baz"]);
            assert_eq!(
                fs::read_to_string(dir.join("0003-Baz.patch")).unwrap(),
                "Subject: 0003 Baz\n+a.txt\n"
            );
            assert_eq!(
                fs::read_to_string(dir.join("Baz.patch")).unwrap(),
                "Subject: Baz\n+c.txt\n"
            );
            assert!(set.warnings.is_empty());
        }

        #[test]
        fn slug_never_overwrites_retained_file() {
            let (_tmp, dir, list) = layout();
            let vcs = MockVcs::new("/work")
                .with_export("Keep.patch", "odd export\n")
                .with_export("0002-Keep.patch", "Subject: Keep\n");

            let set = generate(&vcs, &dir, &list);

            assert_eq!(fs::read_to_string(dir.join("Keep.patch")).unwrap(), "odd export\n");
            assert_eq!(set.names, vec![PatchName::new("Keep-2").unwrap()]);
            assert_eq!(
                fs::read_to_string(dir.join("Keep-2.patch")).unwrap(),
                "Subject: Keep\n"
            );
        }
    }

    mod content {
        use super::*;

        #[test]
        fn provenance_and_index_lines_removed() {
            let (_tmp, dir, list) = layout();
            let vcs = MockVcs::new("/work").with_export("0001-Add-hooks.patch", ADD_HOOKS);

            generate(&vcs, &dir, &list);

            let written = fs::read_to_string(dir.join("Add-hooks.patch")).unwrap();
            assert!(written.starts_with("From: Jane Doe"));
            assert!(!written.contains("index 3b18e51"));
            assert!(written.contains("+// hooked\n"));
        }
    }

    mod replacement {
        use super::*;

        #[test]
        fn stale_patches_are_removed() {
            let (_tmp, dir, list) = layout();
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("Old.patch"), "old").unwrap();
            fs::write(dir.join("notes.txt"), "keep").unwrap();

            let vcs = MockVcs::new("/work").with_export("0001-New.patch", "Subject: New\n");
            generate(&vcs, &dir, &list);

            assert!(!dir.join("Old.patch").exists());
            assert!(dir.join("notes.txt").exists());
            assert_eq!(fs::read_to_string(&list).unwrap(), "New\n");
        }

        #[test]
        fn empty_range_writes_empty_list() {
            let (_tmp, dir, list) = layout();
            let vcs = MockVcs::new("/work");
            let set = generate(&vcs, &dir, &list);
            assert!(set.names.is_empty());
            assert_eq!(fs::read_to_string(&list).unwrap(), "");
        }

        #[test]
        fn export_failure_propagates() {
            let (_tmp, dir, list) = layout();
            let vcs = MockVcs::new("/work").fail_on(FailOn::ExportPatches);
            let err =
                generate_patches(&vcs, "upstream/master", &dir, &list, &Reporter::quiet()).unwrap_err();
            assert!(matches!(err, EngineError::Git(_)));
            assert_eq!(
                vcs.operations(),
                vec![MockOperation::ExportPatches {
                    since: "upstream/master".into()
                }]
            );
        }
    }

    #[test]
    fn warnings_serialize_with_kind_tag() {
        let warning = GenerateWarning::DuplicatePatchName {
            name: PatchName::new("Fix").unwrap(),
            renamed: PatchName::new("Fix-2").unwrap(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "duplicate_patch_name");
        assert_eq!(json["renamed"], "Fix-2");
    }
}
