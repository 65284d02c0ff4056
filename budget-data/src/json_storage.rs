//! Scenario persistence in a single pretty-printed JSON file.
//!
//! The file holds a [`StoreSnapshot`]:
//!
//! ```json
//! {
//!   "scenarios": { "baseline": { "metadata": { ... }, ... } },
//!   "current": "baseline"
//! }
//! ```
//!
//! Saves write a sibling temporary file first and rename it over the target,
//! so an interrupted save leaves the previous file intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use budget_core::{ScenarioStorage, StoreSnapshot};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading or writing scenario files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid scenario data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid scenario data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write scenarios: {0}")]
    Write(#[source] io::Error),
}

impl StorageError {
    pub(crate) fn io(
        path: &Path,
        source: io::Error,
    ) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes `content` to `path` through a temporary sibling file.
pub(crate) fn atomic_write(
    path: &Path,
    content: &str,
) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(|e| StorageError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

/// [`ScenarioStorage`] backed by one JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScenarioStorage for JsonFileStorage {
    type Error = StorageError;

    fn load(&self) -> Result<Option<StoreSnapshot>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Scenario file does not exist yet");
                return Ok(None);
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        let snapshot = serde_json::from_str(&content).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(snapshot))
    }

    fn save(
        &self,
        snapshot: &StoreSnapshot,
    ) -> Result<(), StorageError> {
        let mut json = serde_json::to_string_pretty(snapshot)?;
        json.push('\n');
        atomic_write(&self.path, &json)?;

        debug!(
            path = %self.path.display(),
            scenarios = snapshot.scenarios.len(),
            "Saved scenarios"
        );
        Ok(())
    }
}
