//! Persistence and data loading for the budget engine.
//!
//! - [`JsonFileStorage`]: the scenario store in one JSON file
//! - [`import_scenarios`] / [`export_scenarios`]: moving scenario sets in and out
//! - [`TaxTableLoader`]: federal schedules and state rules from CSV

pub mod json_storage;
pub mod scenario_io;
pub mod table_loader;

pub use json_storage::{JsonFileStorage, StorageError};
pub use scenario_io::{export_file, export_scenarios, import_file, import_scenarios};
pub use table_loader::{FederalBracketRecord, StateRuleRecord, TableLoadError, TaxTableLoader};
