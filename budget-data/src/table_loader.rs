//! CSV loader for federal bracket schedules and state tax rules.
//!
//! ## Federal brackets
//!
//! | Column          | Type    | Notes                                   |
//! |-----------------|---------|-----------------------------------------|
//! | `filing_status` | string  | `S`, `MFJ`, `MFS`, `HOH` or the full key |
//! | `min_income`    | decimal | lower bound                             |
//! | `max_income`    | decimal | empty for the unbounded top bracket     |
//! | `rate`          | decimal | e.g. `0.22`                             |
//!
//! ## State rules
//!
//! | Column       | Type    | Notes                                      |
//! |--------------|---------|--------------------------------------------|
//! | `state`      | string  | two-letter code, any case                  |
//! | `kind`       | string  | `none`, `flat` or `progressive`            |
//! | `min_income` | decimal | progressive rows only                      |
//! | `max_income` | decimal | progressive rows only; empty for the top   |
//! | `rate`       | decimal | empty for `none`                           |
//!
//! `none` and `flat` states take exactly one row; progressive states take one
//! row per bracket. Every schedule is validated before it replaces the
//! existing one, and a file either applies completely or not at all.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use budget_core::{FilingStatus, StateTaxRule, TaxBracket, TaxError, TaxTables};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading tax tables.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("could not open {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    #[error("unrecognised rule kind '{kind}' on row {row}")]
    InvalidRuleKind { kind: String, row: usize },

    #[error("row {row} is missing a value for '{column}'")]
    MissingValue { column: &'static str, row: usize },

    #[error("state '{0}' mixes rule kinds or repeats a single-row rule")]
    InconsistentStateRule(String),

    #[error(transparent)]
    Schedule(#[from] TaxError),
}

impl From<csv::Error> for TableLoadError {
    fn from(err: csv::Error) -> Self {
        TableLoadError::CsvParse(err.to_string())
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// One row of the federal brackets CSV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FederalBracketRecord {
    pub filing_status: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// One row of the state rules CSV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StateRuleRecord {
    pub state: String,
    pub kind: String,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub min_income: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub rate: Option<Decimal>,
}

/// Loader for rate tables from CSV files.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse federal bracket records from a CSV reader.
    pub fn parse_federal<R: Read>(reader: R) -> Result<Vec<FederalBracketRecord>, TableLoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: FederalBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse state rule records from a CSV reader.
    pub fn parse_states<R: Read>(reader: R) -> Result<Vec<StateRuleRecord>, TableLoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: StateRuleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups federal records into one schedule per filing status.
    ///
    /// Brackets are ordered by lower bound; row order in the file does not
    /// matter.
    pub fn federal_schedules(
        records: &[FederalBracketRecord]
    ) -> Result<BTreeMap<FilingStatus, Vec<TaxBracket>>, TableLoadError> {
        let mut schedules: BTreeMap<FilingStatus, Vec<TaxBracket>> = BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            let status = FilingStatus::parse(&record.filing_status).ok_or_else(|| {
                TableLoadError::InvalidFilingStatus {
                    status: record.filing_status.clone(),
                    row: index + 1,
                }
            })?;
            schedules.entry(status).or_default().push(TaxBracket::new(
                record.min_income,
                record.max_income,
                record.rate,
            ));
        }

        for brackets in schedules.values_mut() {
            brackets.sort_by_key(|bracket| bracket.min_income);
            TaxBracket::validate_schedule(brackets)?;
        }

        Ok(schedules)
    }

    /// Groups state records into one rule per state code.
    pub fn state_rules(
        records: &[StateRuleRecord]
    ) -> Result<BTreeMap<String, StateTaxRule>, TableLoadError> {
        let mut rules: BTreeMap<String, StateTaxRule> = BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            let row = index + 1;
            let code = record.state.trim().to_ascii_uppercase();
            let rate = || {
                record
                    .rate
                    .ok_or(TableLoadError::MissingValue { column: "rate", row })
            };

            match record.kind.trim().to_ascii_lowercase().as_str() {
                "none" => {
                    if rules.insert(code.clone(), StateTaxRule::None).is_some() {
                        return Err(TableLoadError::InconsistentStateRule(code));
                    }
                }
                "flat" => {
                    if rules.insert(code.clone(), StateTaxRule::flat(rate()?)).is_some() {
                        return Err(TableLoadError::InconsistentStateRule(code));
                    }
                }
                "progressive" => {
                    let min_income = record.min_income.ok_or(TableLoadError::MissingValue {
                        column: "min_income",
                        row,
                    })?;
                    let bracket = TaxBracket::new(min_income, record.max_income, rate()?);

                    match rules
                        .entry(code.clone())
                        .or_insert_with(|| StateTaxRule::progressive(Vec::new()))
                    {
                        StateTaxRule::Progressive { brackets } => brackets.push(bracket),
                        _ => return Err(TableLoadError::InconsistentStateRule(code)),
                    }
                }
                other => {
                    return Err(TableLoadError::InvalidRuleKind {
                        kind: other.to_string(),
                        row,
                    });
                }
            }
        }

        for rule in rules.values_mut() {
            if let StateTaxRule::Progressive { brackets } = rule {
                brackets.sort_by_key(|bracket| bracket.min_income);
                TaxBracket::validate_schedule(brackets)?;
            }
        }

        Ok(rules)
    }

    /// Replaces the federal schedules named in `records`. Statuses absent
    /// from the file keep their current schedule.
    pub fn apply_federal(
        tables: &mut TaxTables,
        records: &[FederalBracketRecord],
    ) -> Result<usize, TableLoadError> {
        let schedules = Self::federal_schedules(records)?;
        let count = schedules.len();

        for (status, brackets) in schedules {
            tables.set_federal_schedule(status, brackets)?;
        }

        info!(schedules = count, "Loaded federal bracket schedules");
        Ok(count)
    }

    /// Adds or replaces the state rules named in `records`.
    pub fn apply_states(
        tables: &mut TaxTables,
        records: &[StateRuleRecord],
    ) -> Result<usize, TableLoadError> {
        let rules = Self::state_rules(records)?;
        let count = rules.len();

        for (code, rule) in rules {
            tables.set_state_rule(&code, rule)?;
        }

        info!(states = count, "Loaded state tax rules");
        Ok(count)
    }

    pub fn load_federal_file(
        tables: &mut TaxTables,
        path: &Path,
    ) -> Result<usize, TableLoadError> {
        let file = File::open(path).map_err(|source| TableLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = Self::parse_federal(file)?;
        Self::apply_federal(tables, &records)
    }

    pub fn load_state_file(
        tables: &mut TaxTables,
        path: &Path,
    ) -> Result<usize, TableLoadError> {
        let file = File::open(path).map_err(|source| TableLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = Self::parse_states(file)?;
        Self::apply_states(tables, &records)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const FEDERAL_CSV: &str = "filing_status,min_income,max_income,rate
S,0,10000,0.10
S,10000,50000,0.20
S,50000,,0.30
MFJ,20000,,0.25
MFJ,0,20000,0.10
";

    const STATES_CSV: &str = "state,kind,min_income,max_income,rate
zz,none,,,
YY,flat,,,0.031
XX,progressive,0,5000,0.01
XX,progressive,5000,,0.05
";

    // =========================================================================
    // federal tests
    // =========================================================================

    #[test]
    fn test_parse_federal_unbounded_max_income() {
        let records = TaxTableLoader::parse_federal(FEDERAL_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 5);
        assert_eq!(
            records[2],
            FederalBracketRecord {
                filing_status: "S".to_string(),
                min_income: dec!(50000),
                max_income: None,
                rate: dec!(0.30),
            }
        );
    }

    #[test]
    fn test_federal_schedules_sorts_rows() {
        let records = TaxTableLoader::parse_federal(FEDERAL_CSV.as_bytes()).unwrap();

        let schedules = TaxTableLoader::federal_schedules(&records).unwrap();

        assert_eq!(
            schedules[&FilingStatus::MarriedFilingJointly],
            vec![
                TaxBracket::new(dec!(0), Some(dec!(20000)), dec!(0.10)),
                TaxBracket::new(dec!(20000), None, dec!(0.25)),
            ]
        );
    }

    #[test]
    fn test_federal_rejects_unknown_status() {
        let csv = "filing_status,min_income,max_income,rate\nQSS,0,,0.10";
        let records = TaxTableLoader::parse_federal(csv.as_bytes()).unwrap();

        let err = TaxTableLoader::federal_schedules(&records).expect_err("QSS is not supported");

        let TableLoadError::InvalidFilingStatus { status, row } = err else {
            panic!("Expected InvalidFilingStatus error, got: {:?}", err);
        };
        assert_eq!(status, "QSS");
        assert_eq!(row, 1);
    }

    #[test]
    fn test_federal_rejects_gap_in_schedule() {
        let csv = "filing_status,min_income,max_income,rate\nS,0,1000,0.10\nS,2000,,0.20";
        let records = TaxTableLoader::parse_federal(csv.as_bytes()).unwrap();

        let result = TaxTableLoader::federal_schedules(&records);

        assert!(matches!(
            result,
            Err(TableLoadError::Schedule(TaxError::InvalidBracketSchedule(_)))
        ));
    }

    #[test]
    fn test_parse_federal_bad_decimal() {
        let csv = "filing_status,min_income,max_income,rate\nS,abc,1000,0.10";

        let err = TaxTableLoader::parse_federal(csv.as_bytes()).expect_err("Should fail for invalid decimal");

        assert!(matches!(err, TableLoadError::CsvParse(_)), "got {err:?}");
    }

    #[test]
    fn test_apply_federal_keeps_other_statuses() {
        let mut tables = TaxTables::for_2025();
        let original_hoh = tables.federal_brackets(FilingStatus::HeadOfHousehold).unwrap().to_vec();
        let records = TaxTableLoader::parse_federal(FEDERAL_CSV.as_bytes()).unwrap();

        let count = TaxTableLoader::apply_federal(&mut tables, &records).unwrap();

        assert_eq!(count, 2);
        assert_eq!(tables.federal_brackets(FilingStatus::Single).unwrap().len(), 3);
        assert_eq!(
            tables.federal_brackets(FilingStatus::HeadOfHousehold).unwrap(),
            original_hoh.as_slice()
        );
    }

    // =========================================================================
    // state tests
    // =========================================================================

    #[test]
    fn test_state_rules_by_kind() {
        let records = TaxTableLoader::parse_states(STATES_CSV.as_bytes()).unwrap();

        let rules = TaxTableLoader::state_rules(&records).unwrap();

        assert_eq!(rules["ZZ"], StateTaxRule::None);
        assert_eq!(rules["YY"], StateTaxRule::flat(dec!(0.031)));
        assert_eq!(
            rules["XX"],
            StateTaxRule::progressive(vec![
                TaxBracket::new(dec!(0), Some(dec!(5000)), dec!(0.01)),
                TaxBracket::new(dec!(5000), None, dec!(0.05)),
            ])
        );
    }

    #[test]
    fn test_state_flat_requires_rate() {
        let csv = "state,kind,min_income,max_income,rate\nYY,flat,,,";
        let records = TaxTableLoader::parse_states(csv.as_bytes()).unwrap();

        let err = TaxTableLoader::state_rules(&records).unwrap_err();

        assert!(matches!(err, TableLoadError::MissingValue { column: "rate", row: 1 }), "got {err:?}");
    }

    #[test]
    fn test_state_mixed_kinds_rejected() {
        let csv = "state,kind,min_income,max_income,rate\nYY,flat,,,0.03\nYY,progressive,0,,0.05";
        let records = TaxTableLoader::parse_states(csv.as_bytes()).unwrap();

        let err = TaxTableLoader::state_rules(&records).unwrap_err();

        assert!(matches!(err, TableLoadError::InconsistentStateRule(ref code) if code == "YY"));
    }

    #[test]
    fn test_state_unknown_kind_rejected() {
        let csv = "state,kind,min_income,max_income,rate\nYY,graduated,,,0.03";
        let records = TaxTableLoader::parse_states(csv.as_bytes()).unwrap();

        let err = TaxTableLoader::state_rules(&records).unwrap_err();

        assert!(matches!(err, TableLoadError::InvalidRuleKind { row: 1, .. }));
    }

    #[test]
    fn test_apply_states_adds_new_codes() {
        let mut tables = TaxTables::for_2025();
        let records = TaxTableLoader::parse_states(STATES_CSV.as_bytes()).unwrap();

        let count = TaxTableLoader::apply_states(&mut tables, &records).unwrap();

        assert_eq!(count, 3);
        assert_eq!(tables.state_rule("yy"), Some(&StateTaxRule::flat(dec!(0.031))));
        assert_eq!(tables.state_rule("CA").map(StateTaxRule::kind), Some("progressive"));
    }
}
