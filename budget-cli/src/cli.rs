use std::path::PathBuf;

use budget_core::{Assignee, Category, FilingStatus, PayFrequency, PersonId};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::config::AppConfig;
use crate::utils::parse_amount;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Household tax and cash-flow planner.
///
/// Scenarios are kept in one JSON file. Commands that change scenarios save
/// the file before exiting.
#[derive(Debug, Parser)]
#[command(name = "budget", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file. Defaults to `budget.toml` when it exists.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Scenario file, overriding the configuration.
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Log level or filter directive, overriding the configuration.
    /// `RUST_LOG` takes precedence over both.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Command-line flags win over values read from the configuration file.
    pub fn apply_overrides(
        &self,
        config: &mut AppConfig,
    ) {
        if let Some(path) = &self.data_file {
            config.data_file = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Household report for a scenario (the current one by default)
    Summary {
        scenario: Option<String>,
        /// Print the calculation as JSON
        #[arg(long)]
        json: bool,
    },
    /// One member's taxes and share of expenses
    Person {
        /// `1`, `2`, `person1` or `person2`
        #[arg(value_parser = parse_person)]
        person: PersonId,
        scenario: Option<String>,
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },
    /// List scenarios; the current one is marked with `*`
    List,
    /// Create a scenario from another one, or from the built-in baseline
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Scenario to copy inputs from
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Copy a scenario under a new name
    Duplicate { source: String, name: String },
    /// Delete a scenario; `baseline` cannot be deleted
    Delete { name: String },
    /// Make a scenario current
    Switch { name: String },
    /// Change inputs of a scenario (the current one by default)
    Update(UpdateArgs),
    /// Merge scenarios from a JSON file, overwriting equal names
    Import { file: PathBuf },
    /// Write every scenario as JSON to a file, or to stdout
    Export { file: Option<PathBuf> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayFrequencyArg {
    Weekly,
    Biweekly,
    Semimonthly,
    Monthly,
}

impl From<PayFrequencyArg> for PayFrequency {
    fn from(value: PayFrequencyArg) -> Self {
        match value {
            PayFrequencyArg::Weekly => Self::Weekly,
            PayFrequencyArg::Biweekly => Self::Biweekly,
            PayFrequencyArg::Semimonthly => Self::Semimonthly,
            PayFrequencyArg::Monthly => Self::Monthly,
        }
    }
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Scenario to change (the current one by default)
    pub scenario: Option<String>,

    /// JSON file with a partial update; flags below are applied on top
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub description: Option<String>,

    /// `S`, `MFJ`, `MFS`, `HOH` or the full key, e.g. `marriedFilingJointly`
    #[arg(long)]
    pub filing_status: Option<FilingStatus>,

    /// Two-letter state code
    #[arg(long)]
    pub state: Option<String>,

    /// Member the income flags apply to
    #[arg(long, value_parser = parse_person, default_value = "1")]
    pub person: PersonId,

    #[arg(long, value_parser = parse_amount)]
    pub salary: Option<Decimal>,

    #[arg(long, value_parser = parse_amount)]
    pub bonus: Option<Decimal>,

    #[arg(long, value_parser = parse_amount)]
    pub other_income: Option<Decimal>,

    #[arg(long, value_enum)]
    pub pay_frequency: Option<PayFrequencyArg>,

    #[arg(long, value_parser = parse_amount)]
    pub retirement_401k: Option<Decimal>,

    #[arg(long, value_parser = parse_amount)]
    pub health_insurance: Option<Decimal>,

    #[arg(long, value_parser = parse_amount)]
    pub hsa: Option<Decimal>,

    #[arg(long, value_parser = parse_amount)]
    pub other_deduction: Option<Decimal>,

    /// Remove the second member's income
    #[arg(long)]
    pub remove_person2: bool,

    /// Set a monthly expense: `CATEGORY/PATH=AMOUNT[@ASSIGNEE]`,
    /// e.g. `fixedCosts/housing/rent=2100@shared`. Repeatable.
    #[arg(long = "set-expense", value_parser = parse_expense_assignment)]
    pub set_expenses: Vec<ExpenseAssignment>,

    /// Remove an expense or sub-category: `CATEGORY/PATH`. Repeatable.
    #[arg(long = "remove-expense", value_parser = parse_expense_path)]
    pub remove_expenses: Vec<ExpensePath>,
}

/// A category plus a non-empty path below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpensePath {
    pub category: Category,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseAssignment {
    pub target: ExpensePath,
    pub amount: Decimal,
    pub assignee: Assignee,
}

pub fn parse_person(s: &str) -> Result<PersonId, String> {
    PersonId::parse(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown member '{s}', expected 1 or 2"))
}

fn parse_assignee(s: &str) -> Result<Assignee, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "shared" => Ok(Assignee::Shared),
        other => parse_person(other).map(Assignee::from),
    }
}

pub fn parse_expense_path(s: &str) -> Result<ExpensePath, String> {
    let mut parts = s.trim().split('/').map(str::trim);
    let category = parts
        .next()
        .and_then(Category::parse)
        .ok_or_else(|| format!("'{s}' does not start with a category key"))?;
    let path: Vec<String> = parts.map(str::to_string).collect();
    if path.is_empty() || path.iter().any(String::is_empty) {
        return Err(format!("'{s}' needs a path below the category"));
    }
    Ok(ExpensePath { category, path })
}

pub fn parse_expense_assignment(s: &str) -> Result<ExpenseAssignment, String> {
    let (target, value) = s
        .split_once('=')
        .ok_or_else(|| format!("'{s}' is not CATEGORY/PATH=AMOUNT"))?;
    let (amount, assignee) = match value.split_once('@') {
        Some((amount, assignee)) => (amount, parse_assignee(assignee)?),
        None => (value, Assignee::Shared),
    };

    Ok(ExpenseAssignment {
        target: parse_expense_path(target)?,
        amount: parse_amount(amount).map_err(|e| e.to_string())?,
        assignee,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // argument parsing
    // =========================================================================

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["budget", "summary", "optimistic", "--data-file", "x.json"])
            .unwrap();

        assert_eq!(cli.data_file, Some(PathBuf::from("x.json")));
        assert!(matches!(
            cli.command,
            Command::Summary { scenario: Some(ref name), json: false } if name == "optimistic"
        ));
    }

    #[test]
    fn flags_override_configuration() {
        let cli = Cli::try_parse_from(["budget", "--log-level", "debug", "list"]).unwrap();
        let mut config = AppConfig::default();

        cli.apply_overrides(&mut config);

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.data_file, AppConfig::default().data_file);
    }

    #[test]
    fn update_flags_are_typed() {
        let cli = Cli::try_parse_from([
            "budget",
            "update",
            "plan",
            "--person",
            "2",
            "--salary",
            "95,000",
            "--retirement-401k",
            "$12,000",
            "--pay-frequency",
            "semimonthly",
            "--filing-status",
            "MFJ",
        ])
        .unwrap();

        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.scenario.as_deref(), Some("plan"));
        assert_eq!(args.person, PersonId::Person2);
        assert_eq!(args.salary, Some(dec!(95000)));
        assert_eq!(args.retirement_401k, Some(dec!(12000)));
        assert_eq!(args.pay_frequency, Some(PayFrequencyArg::Semimonthly));
        assert_eq!(args.filing_status, Some(FilingStatus::MarriedFilingJointly));
    }

    #[test]
    fn unknown_filing_status_is_rejected() {
        let result = Cli::try_parse_from(["budget", "update", "--filing-status", "joint"]);

        assert!(result.is_err());
    }

    #[test]
    fn person_accepts_number_or_key() {
        assert_eq!(parse_person("1"), Ok(PersonId::Person1));
        assert_eq!(parse_person("Person2"), Ok(PersonId::Person2));
        assert!(parse_person("3").is_err());
    }

    // =========================================================================
    // expense arguments
    // =========================================================================

    #[test]
    fn expense_assignment_with_assignee() {
        let parsed = parse_expense_assignment("fixedCosts/housing/rent=2,100@2").unwrap();

        assert_eq!(
            parsed,
            ExpenseAssignment {
                target: ExpensePath {
                    category: Category::FixedCosts,
                    path: vec!["housing".to_string(), "rent".to_string()],
                },
                amount: dec!(2100),
                assignee: Assignee::Person2,
            }
        );
    }

    #[test]
    fn expense_assignment_defaults_to_shared() {
        let parsed = parse_expense_assignment("savings/vacation=250").unwrap();

        assert_eq!(parsed.assignee, Assignee::Shared);
        assert_eq!(parsed.target.path, vec!["vacation".to_string()]);
    }

    #[test]
    fn expense_path_needs_known_category_and_path() {
        assert!(parse_expense_path("rent").is_err());
        assert!(parse_expense_path("fixedCosts").is_err());
        assert!(parse_expense_path("fixedCosts//rent").is_err());
        assert!(parse_expense_path("housing/rent").is_err());
        assert!(parse_expense_assignment("savings/vacation").is_err());
        assert!(parse_expense_assignment("savings/vacation=lots").is_err());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let salary = Cli::try_parse_from(["budget", "update", "--salary=-50000"]);
        let expense = parse_expense_assignment("fixedCosts/rent=-900");

        assert!(salary.is_err());
        assert_eq!(expense, Err("amount '-900' must not be negative".to_string()));
    }
}
