use std::cell::RefCell;
use std::collections::BTreeMap;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use super::defaults::BASELINE;
use crate::models::Scenario;

/// The persisted form of a store: every scenario by name plus the name of
/// the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub scenarios: BTreeMap<String, Scenario>,
    #[serde(default = "default_current")]
    pub current: String,
}

fn default_current() -> String {
    BASELINE.to_string()
}

/// Backend that persists a [`StoreSnapshot`].
///
/// The store itself performs no I/O; callers load a snapshot through an
/// implementation of this trait and save after mutating operations.
pub trait ScenarioStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<StoreSnapshot>, Self::Error>;

    fn save(
        &self,
        snapshot: &StoreSnapshot,
    ) -> Result<(), Self::Error>;
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    snapshot: RefCell<Option<StoreSnapshot>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStorage for InMemoryStorage {
    type Error = Infallible;

    fn load(&self) -> Result<Option<StoreSnapshot>, Self::Error> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(
        &self,
        snapshot: &StoreSnapshot,
    ) -> Result<(), Self::Error> {
        *self.snapshot.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}
