//! Integration tests for the `pstack` binary.
//!
//! These tests exercise the full CLI and verify behavior against real Git
//! repositories. Each test runs with an isolated HOME so no user
//! configuration leaks in.

use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for running pstack inside `dir`.
fn pstack(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pstack").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("PATCHSTACK_CONFIG")
        .env("NO_COLOR", "1");
    cmd
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// An upstream repository at `<tmp>/upstream` with one commit.
fn upstream(tmp: &Path) {
    let dir = tmp.join("upstream");
    fs::create_dir_all(&dir).unwrap();
    run_git(&dir, &["init", "-b", "main"]);
    run_git(&dir, &["config", "user.email", "test@example.com"]);
    run_git(&dir, &["config", "user.name", "Test User"]);
    fs::write(dir.join("README.md"), "# Upstream\n").unwrap();
    run_git(&dir, &["add", "README.md"]);
    run_git(&dir, &["commit", "-m", "Initial import"]);
}

fn identity(dir: &Path) {
    run_git(dir, &["config", "user.email", "test@example.com"]);
    run_git(dir, &["config", "user.name", "Test User"]);
}

#[test]
fn version_flag_works() {
    let tmp = TempDir::new().unwrap();
    pstack(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pstack"));
}

#[test]
fn help_lists_commands() {
    let tmp = TempDir::new().unwrap();
    pstack(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn completion_generates_script() {
    let tmp = TempDir::new().unwrap();
    pstack(tmp.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pstack"));
}

mod repository {
    use super::*;

    #[test]
    fn init_twice_reports_existing() {
        let tmp = TempDir::new().unwrap();
        pstack(tmp.path()).args(["init", "work"]).assert().success();
        assert!(tmp.path().join("work/.git").exists());

        pstack(tmp.path())
            .args(["init", "work"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already a repository"));
    }

    #[test]
    fn clone_then_head() {
        let tmp = TempDir::new().unwrap();
        upstream(tmp.path());

        pstack(tmp.path())
            .args(["clone", "upstream", "work"])
            .assert()
            .success();

        pstack(tmp.path())
            .args(["head", "--repo", "work"])
            .assert()
            .success()
            .stdout("Initial import\n");
    }

    #[test]
    fn cwd_flag_changes_base_directory() {
        let tmp = TempDir::new().unwrap();
        upstream(tmp.path());
        let elsewhere = TempDir::new().unwrap();

        pstack(elsewhere.path())
            .arg("--cwd")
            .arg(tmp.path())
            .args(["head", "--repo", "upstream"])
            .assert()
            .success()
            .stdout("Initial import\n");
    }

    #[test]
    fn reset_with_configured_remote() {
        let tmp = TempDir::new().unwrap();
        upstream(tmp.path());
        fs::write(tmp.path().join("patchstack.toml"), "remote = \"upstream\"\n").unwrap();

        pstack(tmp.path()).args(["init", "mirror"]).assert().success();
        let url = tmp.path().join("upstream").display().to_string();
        pstack(tmp.path())
            .args(["remote-add", "upstream", &url, "--repo", "mirror"])
            .assert()
            .success();
        pstack(tmp.path())
            .args(["reset", "main", "--repo", "mirror"])
            .assert()
            .success();

        assert_eq!(
            fs::read_to_string(tmp.path().join("mirror/README.md")).unwrap(),
            "# Upstream\n"
        );
    }

    #[test]
    fn invalid_branch_name_fails() {
        let tmp = TempDir::new().unwrap();
        upstream(tmp.path());
        pstack(tmp.path())
            .args(["branch", "bad..name", "--repo", "upstream"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid branch name"));
    }
}

mod patches {
    use super::*;

    /// Clone upstream to `work`, commit one patch, generate into `patches/`.
    fn authored(tmp: &Path) {
        upstream(tmp);
        pstack(tmp).args(["clone", "upstream", "work"]).assert().success();
        let work = tmp.join("work");
        identity(&work);
        fs::write(work.join("README.md"), "# Upstream\n\nPatched.\n").unwrap();
        run_git(&work, &["commit", "-am", "Document patch"]);

        pstack(tmp)
            .args(["generate", "origin/main", "--repo", "work"])
            .assert()
            .success();
    }

    #[test]
    fn generate_writes_default_layout() {
        let tmp = TempDir::new().unwrap();
        authored(tmp.path());

        assert_eq!(
            fs::read_to_string(tmp.path().join("patches/series")).unwrap(),
            "Document-patch\n"
        );
        assert!(tmp.path().join("patches/Document-patch.patch").is_file());
    }

    #[test]
    fn generate_json_report() {
        let tmp = TempDir::new().unwrap();
        authored(tmp.path());

        pstack(tmp.path())
            .args(["generate", "origin/main", "--repo", "work", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"names\""))
            .stdout(predicate::str::contains("Document-patch"));
    }

    #[test]
    fn apply_to_fresh_clone() {
        let tmp = TempDir::new().unwrap();
        authored(tmp.path());
        pstack(tmp.path()).args(["clone", "upstream", "target"]).assert().success();
        identity(&tmp.path().join("target"));

        pstack(tmp.path())
            .args(["apply", "--repo", "target"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Applied 1 patches"));

        assert_eq!(
            fs::read_to_string(tmp.path().join("target/README.md")).unwrap(),
            "# Upstream\n\nPatched.\n"
        );
    }

    #[test]
    fn apply_refuses_dirty_tree_without_force() {
        let tmp = TempDir::new().unwrap();
        authored(tmp.path());
        pstack(tmp.path()).args(["clone", "upstream", "target"]).assert().success();
        identity(&tmp.path().join("target"));
        fs::write(tmp.path().join("target/README.md"), "dirty\n").unwrap();

        pstack(tmp.path())
            .args(["apply", "--repo", "target"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("working tree is not clean"))
            .stderr(predicate::str::contains("README.md"));
    }

    #[test]
    fn check_passes_on_clean_tree() {
        let tmp = TempDir::new().unwrap();
        upstream(tmp.path());
        pstack(tmp.path())
            .args(["check", "--repo", "upstream"])
            .assert()
            .success()
            .stdout(predicate::str::contains("clean"));
    }

    #[test]
    fn quiet_suppresses_progress() {
        let tmp = TempDir::new().unwrap();
        upstream(tmp.path());
        pstack(tmp.path())
            .args(["-q", "check", "--repo", "upstream"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }
}

mod export {
    use super::*;

    #[test]
    fn export_writes_tree() {
        let tmp = TempDir::new().unwrap();
        upstream(tmp.path());

        pstack(tmp.path())
            .args(["export", "upstream", "out"])
            .assert()
            .success();

        assert!(tmp.path().join("out/README.md").is_file());
        assert!(!tmp.path().join("out/.git").exists());
    }
}

mod config {
    use super::*;

    #[test]
    fn invalid_project_config_fails() {
        let tmp = TempDir::new().unwrap();
        upstream(tmp.path());
        fs::write(tmp.path().join("patchstack.toml"), "unknown_key = 1\n").unwrap();

        pstack(tmp.path())
            .args(["reset", "main", "--repo", "upstream"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("configuration"));
    }
}
