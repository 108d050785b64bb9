//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! patchstack has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: `patchstack.toml` next to the sources being patched
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Example
//!
//! ```no_run
//! use patchstack::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("."))).unwrap();
//! println!("patches live in {}", config.patches_dir().display());
//! println!("series file: {}", config.series_file().display());
//! ```

pub mod schema;

pub use schema::{BuildConfig, GlobalConfig, ProjectConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::tool::BuildTool;

/// Name of the project config file.
pub const PROJECT_CONFIG_FILE: &str = "patchstack.toml";

/// Defaults applied when no config sets a value.
pub const DEFAULT_PATCHES_DIR: &str = "patches";
pub const DEFAULT_SERIES_FILE: &str = "patches/series";
pub const DEFAULT_REMOTE: &str = "origin";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence: project config overrides global config,
/// which overrides built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Project configuration (if a project file was found)
    pub project: Option<ProjectConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the project config file (if loaded)
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads `patchstack.toml` from it.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or
    /// validated. Missing config files are not an error.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(Self::find_global().as_deref(), project_dir)
    }

    /// Load configuration from an explicit global file and project directory.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let global: GlobalConfig = match global_path {
            Some(path) => read_toml(path)?,
            None => GlobalConfig::default(),
        };
        global.validate()?;

        let project_path = project_dir
            .map(|dir| dir.join(PROJECT_CONFIG_FILE))
            .filter(|path| path.is_file());
        let project = match &project_path {
            Some(path) => {
                let project: ProjectConfig = read_toml(path)?;
                project.validate()?;
                Some(project)
            }
            None => None,
        };

        Ok(Config {
            global,
            project,
            global_path: global_path.map(Path::to_path_buf),
            project_path,
        })
    }

    /// Find the global config file in standard locations.
    fn find_global() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("PATCHSTACK_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("patchstack/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".patchstack/config.toml"))
            .filter(|path| path.exists())
    }

    /// Paths of the config files that were loaded, global first.
    pub fn sources(&self) -> Vec<&Path> {
        [self.global_path.as_deref(), self.project_path.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Directory holding patch files, relative to the project directory.
    pub fn patches_dir(&self) -> PathBuf {
        PathBuf::from(
            self.project
                .as_ref()
                .and_then(|p| p.patches_dir.as_deref())
                .unwrap_or(DEFAULT_PATCHES_DIR),
        )
    }

    /// List artifact path, relative to the project directory.
    pub fn series_file(&self) -> PathBuf {
        PathBuf::from(
            self.project
                .as_ref()
                .and_then(|p| p.series_file.as_deref())
                .unwrap_or(DEFAULT_SERIES_FILE),
        )
    }

    /// Remote name used by `reset`.
    ///
    /// Defaults to "origin" if not configured.
    pub fn remote(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.remote.as_deref())
            .or(self.global.remote.as_deref())
            .unwrap_or(DEFAULT_REMOTE)
    }

    /// Configured build tool, if any scope names a program.
    ///
    /// Environment appends from both scopes are combined; the project value
    /// wins for a variable set in both.
    pub fn build_tool(&self) -> Option<BuildTool> {
        let global = self.global.build.as_ref();
        let project = self.project.as_ref().and_then(|p| p.build.as_ref());

        let program = project
            .and_then(|b| b.program.as_deref())
            .or(global.and_then(|b| b.program.as_deref()))?;

        let mut env = global.map(|b| b.env.clone()).unwrap_or_default();
        if let Some(project) = project {
            env.extend(project.env.clone());
        }

        Some(
            env.into_iter()
                .fold(BuildTool::new(program), |tool, (key, value)| {
                    tool.append_env(key, value)
                }),
        )
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
