#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration for the fwpack firmware packaging tool
//!
//! Precedence, lowest to highest: built-in defaults, config file
//! (`fwpack.toml` or `--config`), `FWPACK_*` environment variables, CLI
//! flags (applied by the CLI itself).

mod core;

pub use core::{GeneralConfig, PathConfig};

use fwpack_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "fwpack.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

impl Config {
    /// Load configuration from an explicit path, or from `fwpack.toml` in
    /// the working directory, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` when an explicitly requested file is
    /// missing, or `ConfigError::ParseError` for malformed TOML.
    pub async fn load_or_default(path: &Option<PathBuf>) -> Result<Self, Error> {
        match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound {
                        path: explicit.clone(),
                    }
                    .into());
                }
                Self::load_file(explicit).await
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load_file(default).await
                } else {
                    debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    async fn load_file(path: &Path) -> Result<Self, Error> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;
        let config = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Merge `FWPACK_*` environment variables over file values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `FWPACK_COLOR` is not one of
    /// `auto`, `always`, `never`.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(root) = std::env::var("FWPACK_BUILD_ROOT") {
            self.paths.build_root = Some(PathBuf::from(root));
        }
        if let Ok(out) = std::env::var("FWPACK_OUTPUT_DIR") {
            self.paths.output_dir = Some(PathBuf::from(out));
        }
        if let Ok(color) = std::env::var("FWPACK_COLOR") {
            self.general.color = match color.as_str() {
                "auto" => fwpack_types::ColorChoice::Auto,
                "always" => fwpack_types::ColorChoice::Always,
                "never" => fwpack_types::ColorChoice::Never,
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: "general.color".to_string(),
                        value: other.to_string(),
                    }
                    .into())
                }
            };
        }
        Ok(())
    }

    /// Build root after defaulting (the working directory)
    #[must_use]
    pub fn build_root(&self) -> PathBuf {
        self.paths
            .build_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Output root after defaulting (`./packages`)
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.paths
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("packages"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_explicit_config_is_an_error() {
        let err = Config::load_or_default(&Some(PathBuf::from("/nonexistent/fwpack.toml")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_file_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fwpack.toml");
        tokio::fs::write(
            &path,
            r#"
[paths]
build_root = "/work/fw"
"#,
        )
        .await
        .unwrap();

        let config = Config::load_or_default(&Some(path)).await.unwrap();
        assert_eq!(config.build_root(), PathBuf::from("/work/fw"));
        // output_dir left at its default
        assert_eq!(config.output_dir(), PathBuf::from("packages"));
    }
}
