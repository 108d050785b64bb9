//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$PATCHSTACK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/patchstack/config.toml`
//! 3. `~/.patchstack/config.toml`
//!
//! # Project Config
//!
//! Located at `patchstack.toml` in the project directory.
//!
//! # Validation
//!
//! Config values are validated after parsing: names must be valid remote
//! names, paths and programs must be non-empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::RemoteName;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// remote = "upstream"
///
/// [build]
/// program = "mvn"
/// env = { MAVEN_OPTS = "-Xmx512M" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default remote used by `reset`
    pub remote: Option<String>,

    /// Build tool defaults
    pub build: Option<BuildConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_remote(self.remote.as_deref())?;
        if let Some(build) = &self.build {
            build.validate()?;
        }
        Ok(())
    }
}

/// Project configuration.
///
/// # Example
///
/// ```toml
/// patches_dir = "Bukkit-Patches"
/// series_file = "Bukkit-Patches/series"
/// remote = "upstream"
///
/// [build]
/// program = "mvn"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory holding patch files
    pub patches_dir: Option<String>,

    /// List artifact naming patches in apply order
    pub series_file: Option<String>,

    /// Remote used by `reset`
    pub remote: Option<String>,

    /// Build tool for this project
    pub build: Option<BuildConfig>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_remote(self.remote.as_deref())?;
        for (key, value) in [
            ("patches_dir", &self.patches_dir),
            ("series_file", &self.series_file),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(format!("{key} cannot be empty")));
            }
        }
        if let Some(build) = &self.build {
            build.validate()?;
        }
        Ok(())
    }
}

/// External build tool settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Program to run, looked up on `PATH`
    pub program: Option<String>,

    /// Values appended (space separated) to existing environment variables
    pub env: BTreeMap<String, String>,
}

impl BuildConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "build.program cannot be empty".into(),
            ));
        }
        if self.env.keys().any(|k| k.is_empty() || k.contains('=')) {
            return Err(ConfigError::InvalidValue(
                "build.env keys must be non-empty and cannot contain '='".into(),
            ));
        }
        Ok(())
    }
}

fn validate_remote(remote: Option<&str>) -> Result<(), ConfigError> {
    if let Some(remote) = remote {
        RemoteName::new(remote).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod global {
        use super::*;

        #[test]
        fn defaults() {
            let config = GlobalConfig::default();
            assert!(config.remote.is_none());
            assert!(config.build.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn parses_build_table() {
            let config: GlobalConfig = toml::from_str(
                r#"
                [build]
                program = "mvn"
                env = { MAVEN_OPTS = "-Xmx512M" }
                "#,
            )
            .unwrap();
            let build = config.build.unwrap();
            assert_eq!(build.program.as_deref(), Some("mvn"));
            assert_eq!(build.env.get("MAVEN_OPTS").map(String::as_str), Some("-Xmx512M"));
        }

        #[test]
        fn unknown_field_rejected() {
            assert!(toml::from_str::<GlobalConfig>("trunk = \"main\"").is_err());
        }
    }

    mod project {
        use super::*;

        #[test]
        fn invalid_remote() {
            let config = ProjectConfig {
                remote: Some("has space".into()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn empty_paths_rejected() {
            let config = ProjectConfig {
                series_file: Some("  ".into()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn empty_build_program_rejected() {
            let config = ProjectConfig {
                build: Some(BuildConfig {
                    program: Some(String::new()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn roundtrip() {
            let config = ProjectConfig {
                patches_dir: Some("Bukkit-Patches".into()),
                series_file: Some("Bukkit-Patches/series".into()),
                remote: Some("upstream".into()),
                build: None,
            };
            let text = toml::to_string(&config).unwrap();
            let parsed: ProjectConfig = toml::from_str(&text).unwrap();
            assert_eq!(parsed, config);
        }
    }
}
