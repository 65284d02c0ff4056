use std::collections::BTreeMap;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use super::defaults::{self, BASELINE};
use super::storage::{ScenarioStorage, StoreSnapshot};
use crate::models::{Scenario, ScenarioError, ScenarioUpdate};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("scenario '{0}' already exists")]
    DuplicateName(String),

    #[error("scenario '{0}' not found")]
    NotFound(String),

    #[error("scenario '{0}' is protected and cannot be deleted")]
    ProtectedScenario(String),

    #[error("scenario name must not be empty")]
    EmptyName,

    #[error("scenario '{name}' is invalid")]
    InvalidScenario {
        name: String,
        #[source]
        source: ScenarioError,
    },
}

impl StoreError {
    fn invalid(
        name: &str,
        source: ScenarioError,
    ) -> Self {
        Self::InvalidScenario {
            name: name.to_string(),
            source,
        }
    }
}

/// What a store operation changed. Callers react to it instead of
/// registering callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioChange {
    Created(String),
    Updated(String),
    /// `current` is the current scenario after the deletion.
    Deleted { name: String, current: String },
    CurrentChanged(String),
    Imported(Vec<String>),
}

/// Named scenarios plus the name of the current one.
///
/// `baseline` always exists and the current name always refers to a stored
/// scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioStore {
    scenarios: BTreeMap<String, Scenario>,
    current: String,
}

impl Default for ScenarioStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ScenarioStore {
    /// A store seeded with the built-in scenarios; `baseline` is current.
    pub fn with_defaults() -> Self {
        let scenarios = defaults::default_scenarios(Utc::now())
            .into_iter()
            .map(|scenario| (scenario.metadata.name.clone(), scenario))
            .collect();

        Self {
            scenarios,
            current: BASELINE.to_string(),
        }
    }

    /// Rebuilds a store from persisted state. An empty snapshot is seeded
    /// with the built-in scenarios, a missing `baseline` is re-seeded and an
    /// unknown current name falls back to `baseline`.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        if snapshot.scenarios.is_empty() {
            debug!("Snapshot holds no scenarios; seeding defaults");
            return Self::with_defaults();
        }

        let mut store = Self {
            scenarios: snapshot.scenarios,
            current: snapshot.current,
        };
        store.normalize_names();
        store.ensure_baseline();
        if !store.scenarios.contains_key(&store.current) {
            debug!(current = %store.current, "Current scenario missing; using baseline");
            store.current = BASELINE.to_string();
        }
        store
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            scenarios: self.scenarios.clone(),
            current: self.current.clone(),
        }
    }

    /// Loads the store from `storage`, seeding defaults when nothing has
    /// been saved.
    pub fn load<S: ScenarioStorage>(storage: &S) -> Result<Self, S::Error> {
        Ok(match storage.load()? {
            Some(snapshot) => Self::from_snapshot(snapshot),
            None => {
                info!("No saved scenarios; starting from defaults");
                Self::with_defaults()
            }
        })
    }

    pub fn save<S: ScenarioStorage>(
        &self,
        storage: &S,
    ) -> Result<(), S::Error> {
        storage.save(&self.snapshot())
    }

    /// Scenario names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.scenarios.contains_key(name)
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Scenario> {
        self.scenarios.get(name)
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn current(&self) -> &Scenario {
        match self.scenarios.get(&self.current) {
            Some(scenario) => scenario,
            None => unreachable!("current scenario '{}' is always stored", self.current),
        }
    }

    /// Makes `name` current. Returns `false` and changes nothing if no such
    /// scenario exists.
    pub fn set_current(
        &mut self,
        name: &str,
    ) -> bool {
        if !self.scenarios.contains_key(name) {
            return false;
        }
        self.current = name.to_string();
        true
    }

    /// Like [`set_current`](Self::set_current) but reports the change.
    pub fn switch_to(
        &mut self,
        name: &str,
    ) -> Result<ScenarioChange, StoreError> {
        if !self.set_current(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(ScenarioChange::CurrentChanged(name.to_string()))
    }

    /// Creates `name` as a copy of `base`, or of the built-in baseline when
    /// no base is given.
    pub fn create_scenario(
        &mut self,
        name: &str,
        description: &str,
        base: Option<&str>,
    ) -> Result<ScenarioChange, StoreError> {
        let name = self.check_new_name(name)?;
        let now = Utc::now();

        let scenario = match base {
            Some(base) => self
                .scenarios
                .get(base)
                .ok_or_else(|| StoreError::NotFound(base.to_string()))?
                .renamed(&name, description, now),
            None => defaults::baseline(now).renamed(&name, description, now),
        };

        info!(scenario = %name, base = base.unwrap_or("defaults"), "Created scenario");
        self.scenarios.insert(name.clone(), scenario);
        Ok(ScenarioChange::Created(name))
    }

    /// Copies `source` to `new_name` with the description
    /// `"Copy of <source description>"`.
    pub fn duplicate_scenario(
        &mut self,
        source: &str,
        new_name: &str,
    ) -> Result<ScenarioChange, StoreError> {
        let description = match self.scenarios.get(source) {
            Some(scenario) => format!("Copy of {}", scenario.metadata.description),
            None => return Err(StoreError::NotFound(source.to_string())),
        };
        self.create_scenario(new_name, &description, Some(source))
    }

    /// Deletes `name`. If it was current, `baseline` becomes current.
    pub fn delete_scenario(
        &mut self,
        name: &str,
    ) -> Result<ScenarioChange, StoreError> {
        if name == BASELINE {
            return Err(StoreError::ProtectedScenario(name.to_string()));
        }
        if self.scenarios.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        if self.current == name {
            self.current = BASELINE.to_string();
        }

        info!(scenario = %name, current = %self.current, "Deleted scenario");
        Ok(ScenarioChange::Deleted {
            name: name.to_string(),
            current: self.current.clone(),
        })
    }

    /// Applies `update` to `name` and refreshes its modified time. A
    /// rejected update leaves the stored scenario untouched.
    pub fn update_scenario(
        &mut self,
        name: &str,
        update: &ScenarioUpdate,
    ) -> Result<ScenarioChange, StoreError> {
        let scenario = self
            .scenarios
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        let mut updated = scenario.clone();
        update
            .apply(&mut updated)
            .map_err(|source| StoreError::invalid(name, source))?;
        updated.metadata.modified = Utc::now();
        *scenario = updated;

        debug!(scenario = %name, "Updated scenario");
        Ok(ScenarioChange::Updated(name.to_string()))
    }

    /// Merges `scenarios` into the store. Imported names overwrite existing
    /// ones; each scenario's metadata name is set to its key.
    ///
    /// Nothing is imported if any scenario fails [`Scenario::validate`].
    pub fn import(
        &mut self,
        scenarios: BTreeMap<String, Scenario>,
    ) -> Result<ScenarioChange, StoreError> {
        for (name, scenario) in &scenarios {
            scenario
                .validate()
                .map_err(|source| StoreError::invalid(name, source))?;
        }

        let mut names = Vec::with_capacity(scenarios.len());
        for (name, mut scenario) in scenarios {
            if name.trim().is_empty() {
                debug!("Skipping imported scenario with an empty name");
                continue;
            }
            scenario.metadata.name = name.clone();
            self.scenarios.insert(name.clone(), scenario);
            names.push(name);
        }
        self.ensure_baseline();

        info!(count = names.len(), "Imported scenarios");
        Ok(ScenarioChange::Imported(names))
    }

    /// Every scenario by name.
    pub fn export(&self) -> BTreeMap<String, Scenario> {
        self.scenarios.clone()
    }

    fn check_new_name(
        &self,
        name: &str,
    ) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.scenarios.contains_key(name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    fn normalize_names(&mut self) {
        for (name, scenario) in &mut self.scenarios {
            if scenario.metadata.name != *name {
                scenario.metadata.name = name.clone();
            }
        }
    }

    fn ensure_baseline(&mut self) {
        if !self.scenarios.contains_key(BASELINE) {
            info!("Baseline scenario missing; re-seeding");
            self.scenarios
                .insert(BASELINE.to_string(), defaults::baseline(Utc::now()));
        }
    }
}
