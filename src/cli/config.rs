//! Configuration file
//!
//! A JSON object; every key is optional:
//!
//! ```json
//! {
//!   "data_file": "gym_management.csv",
//!   "enforce_all_foreign_keys": false,
//!   "log_format": "text",
//!   "log_level": "warn"
//! }
//! ```
//!
//! A missing configuration file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::validation::ValidationPolicy;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Record file (default `gym_management.csv`)
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Enforce every declared reference, not only Attendance.Member_ID
    #[serde(default)]
    pub enforce_all_foreign_keys: bool,

    /// Log output format (default text)
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log filter directive (default "warn"); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("gym_management.csv")
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            enforce_all_foreign_keys: false,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is absent,
    /// then apply the command-line data file override.
    pub fn resolve(path: &Path, data_file: Option<&Path>) -> CliResult<Self> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        if let Some(file) = data_file {
            config.data_file = file.to_path_buf();
            config.validate()?;
        }
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }
        if self.data_file.is_dir() {
            return Err(CliError::config_error(format!(
                "data_file '{}' is a directory",
                self.data_file.display()
            )));
        }
        if self.log_level.trim().is_empty() {
            return Err(CliError::config_error("log_level must not be empty"));
        }
        Ok(())
    }

    /// Record file path
    pub fn data_path(&self) -> &Path {
        &self.data_file
    }

    /// Validation policy derived from this configuration
    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            enforce_all_foreign_keys: self.enforce_all_foreign_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::resolve(&dir.path().join("absent.json"), None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_path(), Path::new("gym_management.csv"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gymstore.json");
        fs::write(&path, r#"{"enforce_all_foreign_keys": true, "log_format": "json"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.enforce_all_foreign_keys);
        assert!(config.policy().enforce_all_foreign_keys);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gymstore.json");
        fs::write(&path, r#"{"datafile": "x.csv"}"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "GYM_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_data_file_override() {
        let dir = TempDir::new().unwrap();
        let override_path = dir.path().join("other.csv");
        let config =
            Config::resolve(&dir.path().join("absent.json"), Some(&override_path)).unwrap();
        assert_eq!(config.data_path(), override_path.as_path());
    }

    #[test]
    fn test_directory_data_file_rejected() {
        let dir = TempDir::new().unwrap();
        let err = Config::resolve(&dir.path().join("absent.json"), Some(dir.path())).unwrap_err();
        assert!(err.message().contains("directory"));
    }
}
