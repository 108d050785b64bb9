//! tool
//!
//! Invocation of external build tools (Maven, make, ...).
//!
//! A [`BuildTool`] is a program plus environment adjustments. Adjustments
//! append to whatever the caller's environment already holds rather than
//! replacing it, so `MAVEN_OPTS=-Dfoo` in the shell plus an append of
//! `-Xmx512M` runs Maven with `MAVEN_OPTS="-Dfoo -Xmx512M"`.
//!
//! # Example
//!
//! ```no_run
//! use patchstack::tool::BuildTool;
//!
//! BuildTool::new("mvn")
//!     .append_env("MAVEN_OPTS", "-Xmx512M")
//!     .run(["clean", "install"])
//!     .unwrap();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors from running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("'{program}' failed with {}", describe_code(.code))]
    Failed { program: String, code: Option<i32> },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// An external program with environment appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTool {
    program: String,
    env_appends: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
}

impl BuildTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            env_appends: Vec::new(),
            current_dir: None,
        }
    }

    /// Append `value` to environment variable `key` when the tool runs.
    pub fn append_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_appends.push((key.into(), value.into()));
        self
    }

    /// Run the tool in `dir` instead of the current directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn env_appends(&self) -> &[(String, String)] {
        &self.env_appends
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Build the command without running it.
    pub fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        for (key, value) in &self.env_appends {
            cmd.env(key, appended(std::env::var(key).ok().as_deref(), value));
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run the tool to completion, inheriting stdio.
    ///
    /// # Errors
    ///
    /// - [`ToolError::Spawn`] if the program cannot be started
    /// - [`ToolError::Failed`] if it exits unsuccessfully
    pub fn run<I, S>(&self, args: I) -> Result<(), ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let status = self
            .command(args)
            .status()
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolError::Failed {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}

/// Maven with the heap limit the patched builds need.
pub fn maven() -> BuildTool {
    BuildTool::new("mvn").append_env("MAVEN_OPTS", "-Xmx512M")
}

/// Join an existing environment value and an appended one with a space.
fn appended(existing: Option<&str>, value: &str) -> String {
    match existing.filter(|v| !v.is_empty()) {
        Some(existing) => format!("{existing} {value}"),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_values() {
        assert_eq!(appended(None, "-Xmx512M"), "-Xmx512M");
        assert_eq!(appended(Some(""), "-Xmx512M"), "-Xmx512M");
        assert_eq!(appended(Some("-Dfoo"), "-Xmx512M"), "-Dfoo -Xmx512M");
    }

    #[test]
    fn maven_preset() {
        let tool = maven();
        assert_eq!(tool.program(), "mvn");
        assert_eq!(
            tool.env_appends(),
            &[("MAVEN_OPTS".to_string(), "-Xmx512M".to_string())]
        );
    }

    #[test]
    fn command_carries_args_and_dir() {
        let tool = BuildTool::new("make").current_dir("/tmp");
        let cmd = tool.command(["-j4", "all"]);
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["-j4", "all"]);
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = BuildTool::new("patchstack-no-such-program-xyz")
            .run(std::iter::empty::<&str>())
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        #[test]
        fn success_and_failure_exit_codes() {
            assert!(BuildTool::new("true").run(std::iter::empty::<&str>()).is_ok());

            let err = BuildTool::new("sh").run(["-c", "exit 3"]).unwrap_err();
            match err {
                ToolError::Failed { code, .. } => assert_eq!(code, Some(3)),
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn env_append_reaches_child() {
            let tool = BuildTool::new("sh").append_env("PATCHSTACK_TOOL_TEST_VAR", "-Xmx512M");
            assert!(tool
                .run(["-c", "test \"$PATCHSTACK_TOOL_TEST_VAR\" = \"-Xmx512M\""])
                .is_ok());
        }
    }
}
