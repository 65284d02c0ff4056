//! Integration tests for the CSV table loader against the on-disk fixtures.

use std::path::{Path, PathBuf};

use budget_core::{FilingStatus, StateTaxRule, TaxEngine, TaxTables, TaxYearConfig};
use budget_data::{TableLoadError, TaxTableLoader};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name)
}

#[test]
fn test_federal_fixture_matches_built_in_tables() {
    let built_in = TaxTables::for_2025();
    let mut loaded = TaxTables::empty(TaxYearConfig::for_2025());

    let count = TaxTableLoader::load_federal_file(&mut loaded, &fixture("federal_brackets_2025.csv"))
        .expect("fixture should load");

    assert_eq!(count, 4);
    for status in FilingStatus::ALL {
        assert_eq!(loaded.federal_brackets(status), built_in.federal_brackets(status), "{status}");
    }
}

#[test]
fn test_loaded_tables_drive_the_engine() {
    let mut tables = TaxTables::empty(TaxYearConfig::for_2025());
    tables.set_standard_deduction(FilingStatus::Single, dec!(15000));
    TaxTableLoader::load_federal_file(&mut tables, &fixture("federal_brackets_2025.csv")).unwrap();
    TaxTableLoader::load_state_file(&mut tables, &fixture("state_rules.csv")).unwrap();
    let engine = TaxEngine::new(&tables);

    let result = engine
        .calculate_all_taxes(dec!(100000), dec!(0), FilingStatus::Single, "IL")
        .unwrap();

    assert_eq!(result.federal_tax, dec!(13614.00));
    assert_eq!(result.state_tax, dec!(4207.50));
}

#[test]
fn test_state_fixture_adds_rules() {
    let mut tables = TaxTables::for_2025();

    let count = TaxTableLoader::load_state_file(&mut tables, &fixture("state_rules.csv")).unwrap();

    assert_eq!(count, 6);
    assert_eq!(tables.state_rule("tx"), Some(&StateTaxRule::None));
    let Some(StateTaxRule::Progressive { brackets }) = tables.state_rule("VT") else {
        panic!("VT should be progressive");
    };
    assert_eq!(brackets.len(), 4);
    assert_eq!(brackets[3].max_income, None);
}

#[test]
fn test_missing_file_is_io_error() {
    let mut tables = TaxTables::for_2025();

    let result = TaxTableLoader::load_state_file(&mut tables, &fixture("nope.csv"));

    assert!(matches!(result, Err(TableLoadError::Io { .. })));
}
