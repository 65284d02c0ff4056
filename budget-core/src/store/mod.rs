//! Named scenarios and the current selection.
//!
//! The store is a plain value owned by the caller. Mutating operations return
//! a [`ScenarioChange`] describing what happened; persistence goes through
//! the [`ScenarioStorage`] trait.

pub mod defaults;
mod scenario_store;
mod storage;

pub use defaults::BASELINE;
pub use scenario_store::{ScenarioChange, ScenarioStore, StoreError};
pub use storage::{InMemoryStorage, ScenarioStorage, StoreSnapshot};
