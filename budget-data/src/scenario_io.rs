//! Import and export of scenario collections.
//!
//! Exports are always the wrapped form written by [`JsonFileStorage`](crate::JsonFileStorage).
//! Imports accept either the wrapped form or a bare `name -> scenario`
//! mapping.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use budget_core::{Scenario, ScenarioStore};
use serde::Deserialize;

use crate::json_storage::{StorageError, atomic_write};

#[derive(Deserialize)]
struct WrappedScenarios {
    scenarios: BTreeMap<String, Scenario>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Wrapped(WrappedScenarios),
    Bare(BTreeMap<String, Scenario>),
}

/// Reads scenarios from `reader`, wrapped or bare.
pub fn import_scenarios<R: Read>(reader: R) -> Result<BTreeMap<String, Scenario>, StorageError> {
    let document: ImportDocument = serde_json::from_reader(reader)?;
    Ok(match document {
        ImportDocument::Wrapped(wrapped) => wrapped.scenarios,
        ImportDocument::Bare(scenarios) => scenarios,
    })
}

/// Writes the whole store, including the current name, to `writer`.
pub fn export_scenarios<W: Write>(
    mut writer: W,
    store: &ScenarioStore,
) -> Result<(), StorageError> {
    serde_json::to_writer_pretty(&mut writer, &store.snapshot())?;
    writer.write_all(b"\n").map_err(StorageError::Write)?;
    Ok(())
}

pub fn import_file(path: &Path) -> Result<BTreeMap<String, Scenario>, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    import_scenarios(BufReader::new(file)).map_err(|e| match e {
        StorageError::Json(source) => StorageError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

pub fn export_file(
    path: &Path,
    store: &ScenarioStore,
) -> Result<(), StorageError> {
    let mut json = serde_json::to_string_pretty(&store.snapshot())?;
    json.push('\n');
    atomic_write(path, &json)
}
