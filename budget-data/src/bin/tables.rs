use std::path::PathBuf;

use anyhow::{Context, Result};
use budget_core::{FilingStatus, StateTaxRule, TaxTables};
use budget_data::TaxTableLoader;
use clap::Parser;

/// Check tax table CSV files and print the resulting tables.
///
/// Federal files have the columns `filing_status,min_income,max_income,rate`.
/// State files have the columns `state,kind,min_income,max_income,rate`,
/// where `kind` is `none`, `flat` or `progressive`.
#[derive(Parser, Debug)]
#[command(name = "budget-tables")]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file with federal bracket schedules
    #[arg(short, long)]
    federal: Option<PathBuf>,

    /// CSV file with state tax rules
    #[arg(short, long)]
    states: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut tables = TaxTables::for_2025();

    if let Some(path) = &args.federal {
        let count = TaxTableLoader::load_federal_file(&mut tables, path)
            .with_context(|| format!("Failed to load federal brackets: {}", path.display()))?;
        println!("Loaded {} federal schedules from {}", count, path.display());
    }

    if let Some(path) = &args.states {
        let count = TaxTableLoader::load_state_file(&mut tables, path)
            .with_context(|| format!("Failed to load state rules: {}", path.display()))?;
        println!("Loaded {} state rules from {}", count, path.display());
    }

    tables.validate().context("Tax tables are inconsistent")?;

    for status in FilingStatus::ALL {
        let brackets = tables.federal_brackets(status).unwrap_or_default();
        println!(
            "{:<26} {} brackets, standard deduction {}",
            status.label(),
            brackets.len(),
            tables.standard_deduction(status)
        );
    }

    for code in tables.state_codes() {
        let description = match tables.state_rule(code) {
            Some(StateTaxRule::None) | None => "no income tax".to_string(),
            Some(StateTaxRule::Flat { rate }) => format!("flat {}", rate),
            Some(StateTaxRule::Progressive { brackets }) => format!("{} brackets", brackets.len()),
        };
        println!("{:<4} {}", code, description);
    }

    Ok(())
}
