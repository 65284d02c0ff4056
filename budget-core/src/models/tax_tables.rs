//! Rate tables consumed by the tax engine.
//!
//! [`TaxTables::for_2025`] carries the built-in federal schedules, standard
//! deductions, state rules and FICA parameters. Any of them can be replaced,
//! typically from CSV files loaded by the data crate.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::{FilingStatus, StateTaxRule, TaxBracket, TaxYearConfig};
use crate::calculations::TaxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTables {
    federal: HashMap<FilingStatus, Vec<TaxBracket>>,
    standard_deductions: HashMap<FilingStatus, Decimal>,
    states: HashMap<String, StateTaxRule>,
    fica: TaxYearConfig,
}

/// Builds a contiguous schedule from ascending lower bounds and rates given
/// in basis points.
fn schedule(
    lower_bounds: &[i64],
    rates_bp: &[i64],
) -> Vec<TaxBracket> {
    lower_bounds
        .iter()
        .zip(rates_bp)
        .enumerate()
        .map(|(index, (&min, &rate))| {
            TaxBracket::new(
                Decimal::from(min),
                lower_bounds.get(index + 1).map(|&max| Decimal::from(max)),
                Decimal::new(rate, 4),
            )
        })
        .collect()
}

const FEDERAL_RATES_BP: [i64; 7] = [1000, 1200, 2200, 2400, 3200, 3500, 3700];

const NO_INCOME_TAX_STATES: [&str; 9] = ["AK", "FL", "NV", "NH", "SD", "TN", "TX", "WA", "WY"];

const FLAT_STATES_BP: [(&str, i64); 11] = [
    ("AZ", 250),
    ("CO", 440),
    ("GA", 539),
    ("IL", 495),
    ("IN", 305),
    ("KY", 400),
    ("MA", 500),
    ("MI", 425),
    ("NC", 425),
    ("PA", 307),
    ("UT", 455),
];

impl TaxTables {
    /// Tables with no schedules at all. Every federal lookup fails until a
    /// schedule is added.
    pub fn empty(fica: TaxYearConfig) -> Self {
        Self {
            federal: HashMap::new(),
            standard_deductions: HashMap::new(),
            states: HashMap::new(),
            fica,
        }
    }

    pub fn for_2025() -> Self {
        let mut federal = HashMap::new();
        federal.insert(
            FilingStatus::Single,
            schedule(
                &[0, 11_925, 48_475, 103_350, 197_300, 250_525, 626_350],
                &FEDERAL_RATES_BP,
            ),
        );
        federal.insert(
            FilingStatus::MarriedFilingJointly,
            schedule(
                &[0, 23_850, 96_950, 206_700, 394_600, 501_050, 751_600],
                &FEDERAL_RATES_BP,
            ),
        );
        federal.insert(
            FilingStatus::MarriedFilingSeparately,
            schedule(
                &[0, 11_925, 48_475, 103_350, 197_300, 250_525, 375_800],
                &FEDERAL_RATES_BP,
            ),
        );
        federal.insert(
            FilingStatus::HeadOfHousehold,
            schedule(
                &[0, 17_000, 64_850, 103_350, 197_300, 250_500, 626_350],
                &FEDERAL_RATES_BP,
            ),
        );

        let standard_deductions = HashMap::from([
            (FilingStatus::Single, Decimal::from(15_000)),
            (FilingStatus::MarriedFilingJointly, Decimal::from(30_000)),
            (FilingStatus::MarriedFilingSeparately, Decimal::from(15_000)),
            (FilingStatus::HeadOfHousehold, Decimal::from(22_500)),
        ]);

        let mut states = HashMap::new();
        for code in NO_INCOME_TAX_STATES {
            states.insert(code.to_string(), StateTaxRule::None);
        }
        for (code, rate) in FLAT_STATES_BP {
            states.insert(code.to_string(), StateTaxRule::flat(Decimal::new(rate, 4)));
        }
        states.insert(
            "CA".to_string(),
            StateTaxRule::progressive(schedule(
                &[0, 10_756, 25_499, 40_245, 55_866, 70_606, 360_659, 432_787, 721_314],
                &[100, 200, 400, 600, 800, 930, 1030, 1130, 1230],
            )),
        );
        states.insert(
            "NY".to_string(),
            StateTaxRule::progressive(schedule(
                &[0, 8_500, 11_700, 13_900, 80_650, 215_400, 1_077_550, 5_000_000, 25_000_000],
                &[400, 450, 525, 550, 600, 685, 965, 1030, 1090],
            )),
        );
        states.insert(
            "NJ".to_string(),
            StateTaxRule::progressive(schedule(
                &[0, 20_000, 35_000, 40_000, 75_000, 500_000, 1_000_000],
                &[140, 175, 350, 553, 637, 897, 1075],
            )),
        );
        states.insert(
            "OR".to_string(),
            StateTaxRule::progressive(schedule(
                &[0, 4_400, 11_050, 125_000],
                &[475, 675, 875, 990],
            )),
        );

        Self {
            federal,
            standard_deductions,
            states,
            fica: TaxYearConfig::for_2025(),
        }
    }

    pub fn federal_brackets(
        &self,
        status: FilingStatus,
    ) -> Option<&[TaxBracket]> {
        self.federal.get(&status).map(Vec::as_slice)
    }

    /// Standard deduction for `status`, falling back to the single filer
    /// amount when the table has no entry.
    pub fn standard_deduction(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        self.standard_deductions
            .get(&status)
            .or_else(|| self.standard_deductions.get(&FilingStatus::Single))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Case-insensitive lookup by two-letter code.
    pub fn state_rule(
        &self,
        state_code: &str,
    ) -> Option<&StateTaxRule> {
        self.states.get(&state_code.trim().to_ascii_uppercase())
    }

    pub fn state_codes(&self) -> Vec<&str> {
        let mut codes: Vec<_> = self.states.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn fica(&self) -> &TaxYearConfig {
        &self.fica
    }

    /// Replaces the federal schedule for `status` after validating it.
    pub fn set_federal_schedule(
        &mut self,
        status: FilingStatus,
        brackets: Vec<TaxBracket>,
    ) -> Result<(), TaxError> {
        TaxBracket::validate_schedule(&brackets)?;
        self.federal.insert(status, brackets);
        Ok(())
    }

    pub fn set_standard_deduction(
        &mut self,
        status: FilingStatus,
        amount: Decimal,
    ) {
        self.standard_deductions.insert(status, amount);
    }

    /// Replaces the rule for `state_code`. Progressive schedules are
    /// validated first.
    pub fn set_state_rule(
        &mut self,
        state_code: &str,
        rule: StateTaxRule,
    ) -> Result<(), TaxError> {
        if let StateTaxRule::Progressive { brackets } = &rule {
            TaxBracket::validate_schedule(brackets)?;
        }
        self.states.insert(state_code.trim().to_ascii_uppercase(), rule);
        Ok(())
    }

    pub fn set_fica(
        &mut self,
        fica: TaxYearConfig,
    ) {
        self.fica = fica;
    }

    /// Validates every schedule held by the tables and the payroll
    /// parameters.
    pub fn validate(&self) -> Result<(), TaxError> {
        self.fica.validate()?;
        for brackets in self.federal.values() {
            TaxBracket::validate_schedule(brackets)?;
        }
        for rule in self.states.values() {
            if let StateTaxRule::Progressive { brackets } = rule {
                TaxBracket::validate_schedule(brackets)?;
            }
        }
        Ok(())
    }
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::for_2025()
    }
}
