//! Income tax engine: federal and state bracket tax, FICA, and the combined
//! per-earner breakdown.
//!
//! # Calculation Order
//!
//! | Step | Figure |
//! |------|--------|
//! | 1    | Taxable income = max(0, gross − pre-tax deductions − standard deduction) |
//! | 2    | Federal tax from the filing status schedule |
//! | 3    | State tax from the state rule (flat 5% for unknown states) |
//! | 4    | FICA on gross − pre-tax deductions |
//! | 5    | Total tax = federal + state + FICA |
//! | 6    | Net income = gross − pre-tax deductions − total tax |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::{FilingStatus, TaxTables};
//! use budget_core::calculations::TaxEngine;
//!
//! let tables = TaxTables::for_2025();
//! let engine = TaxEngine::new(&tables);
//!
//! let result = engine
//!     .calculate_all_taxes(dec!(100000), dec!(10000), FilingStatus::Single, "TX")
//!     .unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(75000.00));
//! assert_eq!(result.federal_tax, dec!(11414.00));
//! assert_eq!(result.state_tax, dec!(0));
//! assert_eq!(result.net_income + result.total_tax + result.pre_tax_deductions, dec!(100000));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::PayrollTaxCalculator;
use crate::calculations::common::{percent_of, round_half_up};
use crate::models::{
    FicaBreakdown, FilingStatus, ScenarioError, StateTaxRule, TaxBracket, TaxResult, TaxTables,
};

/// Rate applied to states missing from the tables.
pub const DEFAULT_STATE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Errors that can occur during tax calculations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaxError {
    /// The filing status is unknown or has no federal schedule.
    #[error("invalid filing status '{0}'")]
    InvalidFilingStatus(String),

    /// A bracket schedule breaks the contiguous, ascending invariant.
    #[error("invalid bracket schedule: {0}")]
    InvalidBracketSchedule(String),

    /// Payroll tax parameters are out of range.
    #[error("invalid payroll tax configuration: {0}")]
    InvalidPayrollConfig(String),

    /// A scenario amount is negative or too large to calculate with.
    #[error("invalid scenario input")]
    InvalidInput(#[from] ScenarioError),

    /// An intermediate figure does not fit in a `Decimal`.
    #[error("{0} is too large to calculate")]
    AmountOverflow(&'static str),
}

/// Sums tax over each bracket the income reaches.
pub fn bracket_tax(
    taxable_income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    let mut tax = Decimal::ZERO;
    for bracket in brackets {
        if taxable_income <= bracket.min_income {
            break;
        }
        tax += bracket.income_in_bracket(taxable_income) * bracket.tax_rate;
    }
    round_half_up(tax)
}

/// Rate of the highest bracket whose lower bound the income exceeds, or
/// zero when it exceeds none.
pub fn bracket_marginal_rate(
    taxable_income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    brackets
        .iter()
        .filter(|bracket| taxable_income > bracket.min_income)
        .last()
        .map_or(Decimal::ZERO, |bracket| bracket.tax_rate)
}

/// Calculator bound to a set of rate tables.
#[derive(Debug, Clone)]
pub struct TaxEngine<'a> {
    tables: &'a TaxTables,
}

impl<'a> TaxEngine<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a TaxTables {
        self.tables
    }

    fn federal_schedule(
        &self,
        filing_status: FilingStatus,
    ) -> Result<&'a [TaxBracket], TaxError> {
        self.tables
            .federal_brackets(filing_status)
            .ok_or_else(|| TaxError::InvalidFilingStatus(filing_status.key().to_string()))
    }

    /// Federal income tax on `taxable_income`, rounded to the cent.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidFilingStatus`] if the tables hold no
    /// schedule for `filing_status`.
    pub fn federal_tax(
        &self,
        taxable_income: Decimal,
        filing_status: FilingStatus,
    ) -> Result<Decimal, TaxError> {
        let brackets = self.federal_schedule(filing_status)?;
        Ok(bracket_tax(taxable_income, brackets))
    }

    /// State income tax on `taxable_income`, rounded to the cent.
    ///
    /// Unknown state codes are taxed at [`DEFAULT_STATE_RATE`].
    pub fn state_tax(
        &self,
        taxable_income: Decimal,
        state_code: &str,
    ) -> Decimal {
        match self.tables.state_rule(state_code) {
            Some(StateTaxRule::None) => Decimal::ZERO,
            Some(StateTaxRule::Flat { rate }) => round_half_up(taxable_income * *rate),
            Some(StateTaxRule::Progressive { brackets }) => bracket_tax(taxable_income, brackets),
            None => {
                warn!(
                    state = %state_code,
                    rate = %DEFAULT_STATE_RATE,
                    "Unknown state code; applying default flat rate"
                );
                round_half_up(taxable_income * DEFAULT_STATE_RATE)
            }
        }
    }

    /// Employee FICA on `gross_wages`.
    pub fn fica(
        &self,
        gross_wages: Decimal,
    ) -> FicaBreakdown {
        PayrollTaxCalculator::new(self.tables.fica()).calculate(gross_wages)
    }

    /// Standard deduction for `filing_status`; single filer amount if the
    /// tables have no entry for it.
    pub fn standard_deduction(
        &self,
        filing_status: FilingStatus,
    ) -> Decimal {
        self.tables.standard_deduction(filing_status)
    }

    /// Total tax as a percentage of gross income; zero when gross is zero
    /// or negative.
    pub fn effective_rate(
        total_tax: Decimal,
        gross_income: Decimal,
    ) -> Decimal {
        percent_of(total_tax, gross_income)
    }

    /// Combined federal and state marginal rate, in percent.
    ///
    /// States without income tax and unknown states contribute zero.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidFilingStatus`] if the tables hold no
    /// federal schedule for `filing_status`.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
        filing_status: FilingStatus,
        state_code: &str,
    ) -> Result<Decimal, TaxError> {
        let federal = bracket_marginal_rate(taxable_income, self.federal_schedule(filing_status)?);

        let state = match self.tables.state_rule(state_code) {
            Some(StateTaxRule::Flat { rate }) if taxable_income > Decimal::ZERO => *rate,
            Some(StateTaxRule::Progressive { brackets }) => {
                bracket_marginal_rate(taxable_income, brackets)
            }
            _ => Decimal::ZERO,
        };

        Ok(((federal + state) * Decimal::ONE_HUNDRED).normalize())
    }

    /// Full breakdown for one earner.
    ///
    /// FICA is computed on gross income less pre-tax deductions, not on
    /// taxable income. Net income is not clamped.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidFilingStatus`] if the tables hold no
    /// federal schedule for `filing_status`.
    pub fn calculate_all_taxes(
        &self,
        gross_income: Decimal,
        pre_tax_deductions: Decimal,
        filing_status: FilingStatus,
        state_code: &str,
    ) -> Result<TaxResult, TaxError> {
        let standard_deduction = self.standard_deduction(filing_status);
        let taxable_income =
            round_half_up(gross_income - pre_tax_deductions - standard_deduction).max(Decimal::ZERO);

        let federal_tax = self.federal_tax(taxable_income, filing_status)?;
        let state_tax = self.state_tax(taxable_income, state_code);
        let fica = self.fica((gross_income - pre_tax_deductions).max(Decimal::ZERO));

        let total_tax = federal_tax + state_tax + fica.total;
        let net_income = gross_income - pre_tax_deductions - total_tax;

        if net_income < Decimal::ZERO {
            warn!(
                gross_income = %gross_income,
                pre_tax_deductions = %pre_tax_deductions,
                total_tax = %total_tax,
                "Net income is negative"
            );
        }

        let effective_rate = Self::effective_rate(total_tax, gross_income);
        let marginal_rate = self.marginal_rate(taxable_income, filing_status, state_code)?;

        debug!(
            gross_income = %gross_income,
            taxable_income = %taxable_income,
            total_tax = %total_tax,
            filing_status = filing_status.as_str(),
            state = %state_code,
            "Calculated taxes"
        );

        Ok(TaxResult {
            gross_income,
            pre_tax_deductions,
            standard_deduction,
            taxable_income,
            federal_tax,
            state_tax,
            fica,
            total_tax,
            net_income,
            effective_rate,
            marginal_rate,
        })
    }
}
