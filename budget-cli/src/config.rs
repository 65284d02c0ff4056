//! `budget.toml` configuration.
//!
//! Every key is optional:
//!
//! ```toml
//! data_file = "scenarios.json"
//! log_level = "info"
//! log_file = "budget.log"
//!
//! [tables]
//! federal_csv = "tables/federal_brackets_2025.csv"
//! state_csv = "tables/state_rules.csv"
//! ```
//!
//! Relative paths are used as given, relative to the working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "budget.toml";

pub const DEFAULT_DATA_FILE: &str = "scenarios.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// CSV files that replace the built-in 2025 tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableOverrides {
    pub federal_csv: Option<PathBuf>,
    pub state_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub tables: TableOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: "warn".to_string(),
            log_file: None,
            tables: TableOverrides::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(
        content: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, or `budget.toml` in the working directory when no path
    /// is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if !explicit && e.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = Self::from_toml(&content, &path)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
