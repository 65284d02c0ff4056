//! End-to-end runs of parsed command lines against fixture files.

use std::fs;
use std::path::{Path, PathBuf};

use budget_cli::{AppConfig, Cli, execute};
use budget_core::store::BASELINE;
use clap::Parser;
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name)
}

/// Loads the configuration the way the binary does and runs `args`.
fn budget(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("budget").chain(args.iter().copied()))?;
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let mut out = Vec::new();
    execute(&config, cli.command, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn summary_json(
    data_file: &str,
    extra: &[&str],
) -> serde_json::Value {
    let mut args = vec!["--data-file", data_file, "summary", "--json"];
    args.extend_from_slice(extra);
    serde_json::from_str(&budget(&args).unwrap()).unwrap()
}

#[test]
fn test_imported_fixture_becomes_reportable() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let data = data.to_str().unwrap();
    let scenarios = fixture("scenarios.json");

    let imported = budget(&["--data-file", data, "import", scenarios.to_str().unwrap()]).unwrap();
    assert_eq!(imported, "Imported 2 scenario(s): partial, single-renter\n");

    // Importing does not change the current scenario.
    let list = budget(&["--data-file", data, "list"]).unwrap();
    assert!(list.lines().any(|line| line.starts_with("* baseline")), "got:\n{list}");

    budget(&["--data-file", data, "switch", "single-renter"]).unwrap();
    let result = summary_json(data, &[]);

    let person1 = &result["person1"];
    assert_eq!(person1["taxes"]["taxableIncome"], 75000.0);
    assert_eq!(person1["taxes"]["federalTax"], 11414.0);
    assert_eq!(person1["taxes"]["stateTax"], 0.0);
    assert_eq!(person1["taxes"]["netIncome"], 71701.0);
    assert_eq!(person1["netPerPaycheck"], 2987.54);
    assert_eq!(result["expensesTotal"], 3410.0);
    assert_eq!(result["summary"]["monthlySurplus"], 2565.08);
}

#[test]
fn test_text_summary_names_the_member() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let data = data.to_str().unwrap();
    budget(&["--data-file", data, "import", fixture("scenarios.json").to_str().unwrap()]).unwrap();

    let report = budget(&["--data-file", data, "summary", "single-renter"]).unwrap();

    let mut lines = report.lines();
    assert_eq!(lines.next(), Some("single-renter: One earner renting in Texas"));
    assert_eq!(lines.next(), Some("Single, TX"));
    assert!(report.contains("Sam"), "got:\n{report}");
    let surplus = report
        .lines()
        .find(|line| line.trim_start().starts_with("Surplus"))
        .unwrap();
    assert!(surplus.ends_with("$2,565.08"), "got {surplus}");
}

#[test]
fn test_config_file_supplies_data_file_and_state_tables() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("from-config.json");
    let config_path = dir.path().join("budget.toml");
    fs::write(
        &config_path,
        format!(
            "data_file = {:?}\n\n[tables]\nstate_csv = {:?}\n",
            data.to_str().unwrap(),
            fixture("state_rules.csv").to_str().unwrap()
        ),
    )
    .unwrap();
    let config = config_path.to_str().unwrap();

    budget(&["--config", config, "import", fixture("scenarios.json").to_str().unwrap()]).unwrap();
    budget(&["--config", config, "update", "single-renter", "--state", "vt"]).unwrap();
    assert!(data.exists());

    let output = budget(&["--config", config, "summary", "single-renter", "--json"]).unwrap();
    let result: serde_json::Value = serde_json::from_str(&output).unwrap();

    // 47,900 at 3.35% plus 27,100 at 6.6%
    assert_eq!(result["person1"]["taxes"]["stateTax"], 3393.25);
}

#[test]
fn test_unknown_state_without_tables_uses_default_rate() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let data = data.to_str().unwrap();
    budget(&["--data-file", data, "import", fixture("scenarios.json").to_str().unwrap()]).unwrap();
    budget(&["--data-file", data, "update", "single-renter", "--state", "VT"]).unwrap();

    let result = summary_json(data, &["single-renter"]);

    assert_eq!(result["person1"]["taxes"]["stateTax"], 3750.0);
}

#[test]
fn test_person_view_for_absent_second_member_is_zero() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let data = data.to_str().unwrap();
    budget(&["--data-file", data, "import", fixture("scenarios.json").to_str().unwrap()]).unwrap();

    let output = budget(&["--data-file", data, "person", "2", "single-renter", "--json"]).unwrap();
    let view: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(view["person"], "person2");
    assert_eq!(view["monthlyNetIncome"], 0.0);
    // Only the rent is assigned to person1; everything else is shared.
    assert_eq!(view["monthlyExpenses"], 705.0);
}

#[test]
fn test_baseline_survives_delete_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let data = data.to_str().unwrap();

    let err = budget(&["--data-file", data, "delete", BASELINE]).unwrap_err();

    assert_eq!(err.to_string(), "scenario 'baseline' is protected and cannot be deleted");
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = budget(&["--config", missing.to_str().unwrap(), "list"]).unwrap_err();

    assert!(err.to_string().contains("nope.toml"), "got {err}");
}
