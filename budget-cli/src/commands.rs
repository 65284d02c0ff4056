//! Command execution.
//!
//! A [`Session`] owns the tax tables and the scenario store for one run.
//! Commands write their output to a caller-supplied writer; commands that
//! change the store save it before returning.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use budget_core::{
    ExpenseEdit, ExpenseItem, HouseholdCalculator, PersonIncomeUpdate, PersonId, Scenario,
    ScenarioChange, ScenarioStore, ScenarioUpdate, StoreError, TaxTables,
};
use budget_data::{JsonFileStorage, TaxTableLoader, export_file, export_scenarios, import_file};
use tracing::{debug, info};

use crate::cli::{Command, UpdateArgs};
use crate::config::{AppConfig, TableOverrides};
use crate::report::{HouseholdReport, PersonReport, ScenarioList};

/// Built-in 2025 tables with any CSV overrides from the configuration.
pub fn load_tables(overrides: &TableOverrides) -> Result<TaxTables> {
    let mut tables = TaxTables::for_2025();

    if let Some(path) = &overrides.federal_csv {
        let count = TaxTableLoader::load_federal_file(&mut tables, path)
            .with_context(|| format!("Failed to load federal brackets: {}", path.display()))?;
        info!(path = %path.display(), count, "Loaded federal schedules");
    }
    if let Some(path) = &overrides.state_csv {
        let count = TaxTableLoader::load_state_file(&mut tables, path)
            .with_context(|| format!("Failed to load state rules: {}", path.display()))?;
        info!(path = %path.display(), count, "Loaded state rules");
    }

    tables.validate().context("Tax tables are inconsistent")?;
    Ok(tables)
}

pub struct Session {
    storage: JsonFileStorage,
    store: ScenarioStore,
    tables: TaxTables,
}

impl Session {
    /// Loads the tables and the scenario file named by `config`. A missing
    /// scenario file starts from the default scenarios.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let tables = load_tables(&config.tables)?;
        let storage = JsonFileStorage::new(&config.data_file);
        let store = ScenarioStore::load(&storage)
            .with_context(|| format!("Failed to load scenarios from {}", config.data_file.display()))?;

        debug!(
            path = %config.data_file.display(),
            scenarios = store.len(),
            current = store.current_name(),
            "Opened session"
        );
        Ok(Self {
            storage,
            store,
            tables,
        })
    }

    pub fn store(&self) -> &ScenarioStore {
        &self.store
    }

    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }

    /// `name`, or the current scenario when `None`.
    pub fn scenario(
        &self,
        name: Option<&str>,
    ) -> Result<&Scenario, StoreError> {
        match name {
            Some(name) => self
                .store
                .get(name)
                .ok_or_else(|| StoreError::NotFound(name.to_string())),
            None => Ok(self.store.current()),
        }
    }

    fn save(&self) -> Result<()> {
        self.store
            .save(&self.storage)
            .with_context(|| format!("Failed to save scenarios to {}", self.storage.path().display()))
    }

    /// Saves, then reports `change` on `out`.
    fn commit(
        &self,
        change: ScenarioChange,
        out: &mut impl Write,
    ) -> Result<()> {
        self.save()?;
        writeln!(out, "{}", describe(&change))?;
        Ok(())
    }
}

/// One-line confirmation for a store change.
pub fn describe(change: &ScenarioChange) -> String {
    match change {
        ScenarioChange::Created(name) => format!("Created scenario '{name}'"),
        ScenarioChange::Updated(name) => format!("Updated scenario '{name}'"),
        ScenarioChange::Deleted { name, current } => {
            format!("Deleted scenario '{name}'; current scenario is '{current}'")
        }
        ScenarioChange::CurrentChanged(name) => format!("Switched to scenario '{name}'"),
        ScenarioChange::Imported(names) if names.is_empty() => "Imported no scenarios".to_string(),
        ScenarioChange::Imported(names) => {
            format!("Imported {} scenario(s): {}", names.len(), names.join(", "))
        }
    }
}

/// Opens a session for `config` and runs `command` in it.
pub fn execute(
    config: &AppConfig,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    let mut session = Session::open(config)?;
    run(&mut session, command, out)
}

pub fn run(
    session: &mut Session,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Summary { scenario, json } => summary(session, scenario.as_deref(), json, out),
        Command::Person {
            person,
            scenario,
            json,
        } => person_view(session, person, scenario.as_deref(), json, out),
        Command::List => {
            write!(out, "{}", ScenarioList { store: &session.store })?;
            Ok(())
        }
        Command::Create {
            name,
            description,
            base,
        } => {
            let change = session
                .store
                .create_scenario(&name, &description, base.as_deref())?;
            session.commit(change, out)
        }
        Command::Duplicate { source, name } => {
            let change = session.store.duplicate_scenario(&source, &name)?;
            session.commit(change, out)
        }
        Command::Delete { name } => {
            let change = session.store.delete_scenario(&name)?;
            session.commit(change, out)
        }
        Command::Switch { name } => {
            let change = session.store.switch_to(&name)?;
            session.commit(change, out)
        }
        Command::Update(args) => update(session, args, out),
        Command::Import { file } => {
            let scenarios = import_file(&file)?;
            let change = session.store.import(scenarios)?;
            session.commit(change, out)
        }
        Command::Export { file: Some(path) } => {
            export_file(&path, &session.store)?;
            writeln!(
                out,
                "Exported {} scenario(s) to {}",
                session.store.len(),
                path.display()
            )?;
            Ok(())
        }
        Command::Export { file: None } => {
            export_scenarios(&mut *out, &session.store)?;
            Ok(())
        }
    }
}

fn summary(
    session: &Session,
    name: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let scenario = session.scenario(name)?;
    let result = HouseholdCalculator::new(&session.tables)
        .calculate_scenario(scenario)
        .with_context(|| format!("Failed to calculate scenario '{}'", scenario.name()))?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &result)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", HouseholdReport { scenario, result: &result })?;
    }
    Ok(())
}

fn person_view(
    session: &Session,
    person: PersonId,
    name: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let scenario = session.scenario(name)?;
    let calculator = HouseholdCalculator::new(&session.tables);
    let result = calculator
        .calculate_scenario(scenario)
        .with_context(|| format!("Failed to calculate scenario '{}'", scenario.name()))?;
    let view = calculator.person_view(person, scenario, &result);

    if json {
        serde_json::to_writer_pretty(&mut *out, &view)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", PersonReport { scenario, view: &view })?;
    }
    Ok(())
}

fn read_update_file(path: &Path) -> Result<ScenarioUpdate> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid scenario update in {}", path.display()))
}

/// The update described by a JSON file (if any) with the flags applied on
/// top.
pub fn build_update(args: &UpdateArgs) -> Result<ScenarioUpdate> {
    let mut update = match &args.file {
        Some(path) => read_update_file(path)?,
        None => ScenarioUpdate::default(),
    };

    if let Some(description) = &args.description {
        update.description = Some(description.clone());
    }
    if let Some(filing_status) = args.filing_status {
        update.filing_status = Some(filing_status);
    }
    if let Some(state) = &args.state {
        update.state = Some(state.clone());
    }

    let income = PersonIncomeUpdate {
        salary: args.salary,
        bonus: args.bonus,
        other_income: args.other_income,
        pay_frequency: args.pay_frequency.map(Into::into),
        retirement_401k: args.retirement_401k,
        health_insurance: args.health_insurance,
        hsa: args.hsa,
        other_deduction: args.other_deduction,
    };
    if income != PersonIncomeUpdate::default() {
        let slot = match args.person {
            PersonId::Person1 => &mut update.person1,
            PersonId::Person2 => &mut update.person2,
        };
        let merged = slot.get_or_insert_with(PersonIncomeUpdate::default);
        merge_income(merged, &income);
    }
    if args.remove_person2 {
        update.remove_person2 = true;
    }

    for assignment in &args.set_expenses {
        update.expense_edits.push(ExpenseEdit::Set {
            category: assignment.target.category,
            path: assignment.target.path.clone(),
            item: ExpenseItem::new(assignment.amount, assignment.assignee),
        });
    }
    for removal in &args.remove_expenses {
        update.expense_edits.push(ExpenseEdit::Remove {
            category: removal.category,
            path: removal.path.clone(),
        });
    }

    Ok(update)
}

fn merge_income(
    target: &mut PersonIncomeUpdate,
    flags: &PersonIncomeUpdate,
) {
    target.salary = flags.salary.or(target.salary);
    target.bonus = flags.bonus.or(target.bonus);
    target.other_income = flags.other_income.or(target.other_income);
    target.pay_frequency = flags.pay_frequency.or(target.pay_frequency);
    target.retirement_401k = flags.retirement_401k.or(target.retirement_401k);
    target.health_insurance = flags.health_insurance.or(target.health_insurance);
    target.hsa = flags.hsa.or(target.hsa);
    target.other_deduction = flags.other_deduction.or(target.other_deduction);
}

fn update(
    session: &mut Session,
    args: UpdateArgs,
    out: &mut impl Write,
) -> Result<()> {
    let update = build_update(&args)?;
    if update.is_empty() {
        bail!("Nothing to update; pass --file or at least one field flag");
    }

    let name = match args.scenario {
        Some(name) => name,
        None => session.store.current_name().to_string(),
    };
    let change = session.store.update_scenario(&name, &update)?;
    session.commit(change, out)
}
