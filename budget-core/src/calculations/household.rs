//! Household-level cash flow built on the tax engine and the categorizer.
//!
//! Both members are taxed separately under the household's filing status and
//! state. A missing second member is calculated as all zeros. The household
//! figures are plain sums of the two, except the rates:
//!
//! - effective rate: household total tax over household gross
//! - marginal rate: combined taxable income of both members, looked up in the
//!   household filing status schedule and the state rule
//!
//! Expenses are monthly; income figures are annual. Monthly values derived
//! from annual ones are rounded to the cent.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::categorizer;
use crate::calculations::common::{monthly, percent_of, round_half_up};
use crate::calculations::{TaxEngine, TaxError};
use crate::models::{
    CategoryBreakdowns, ExpenseCategoryTree, Household, HouseholdResult, HouseholdTotals,
    PersonId, PersonIncome, PersonResult, PersonView, Scenario, SummaryMetrics, TaxResult,
    TaxTables,
};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Calculator for complete scenarios.
#[derive(Debug, Clone)]
pub struct HouseholdCalculator<'a> {
    engine: TaxEngine<'a>,
}

impl<'a> HouseholdCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self {
            engine: TaxEngine::new(tables),
        }
    }

    pub fn engine(&self) -> &TaxEngine<'a> {
        &self.engine
    }

    /// Calculates taxes, expense categories and summary figures for
    /// `scenario`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::InvalidInput`] if an amount fails
    /// [`Scenario::validate`] and [`TaxError::InvalidFilingStatus`] if the
    /// tables hold no federal schedule for the household's filing status.
    pub fn calculate_scenario(
        &self,
        scenario: &Scenario,
    ) -> Result<HouseholdResult, TaxError> {
        scenario.validate()?;
        let household = &scenario.household;
        let absent = PersonIncome::default();

        let person1 = self.person_result(PersonId::Person1, &scenario.income.person1, household)?;
        let person2 = self.person_result(
            PersonId::Person2,
            scenario.income.person2.as_ref().unwrap_or(&absent),
            household,
        )?;

        let totals = self.household_totals(&person1.taxes, &person2.taxes, household)?;
        let expenses_total = self.expenses_total(&scenario.expenses);
        let categories = self.ramit_breakdown(&scenario.expenses, totals.net_income);
        let summary = self.summary_metrics(&person1.taxes, &person2.taxes, expenses_total)?;

        debug!(
            scenario = %scenario.name(),
            gross_income = %totals.gross_income,
            net_income = %totals.net_income,
            monthly_surplus = %summary.monthly_surplus,
            "Calculated scenario"
        );

        Ok(HouseholdResult {
            person1,
            person2,
            household: totals,
            expenses_total,
            categories,
            summary,
        })
    }

    fn person_result(
        &self,
        person: PersonId,
        income: &PersonIncome,
        household: &Household,
    ) -> Result<PersonResult, TaxError> {
        let gross_income = income
            .gross()
            .ok_or(TaxError::AmountOverflow("gross income"))?;
        let taxes = self.engine.calculate_all_taxes(
            gross_income,
            income.pre_tax_deductions.total(),
            household.filing_status,
            &household.state,
        )?;
        let periods = Decimal::from(income.pay_frequency.periods_per_year());

        Ok(PersonResult {
            person,
            pay_frequency: income.pay_frequency,
            net_per_paycheck: round_half_up(taxes.net_income / periods),
            taxes,
        })
    }

    fn household_totals(
        &self,
        person1: &TaxResult,
        person2: &TaxResult,
        household: &Household,
    ) -> Result<HouseholdTotals, TaxError> {
        let gross_income = person1.gross_income + person2.gross_income;
        let total_tax = person1.total_tax + person2.total_tax;
        let combined_taxable = person1.taxable_income + person2.taxable_income;

        Ok(HouseholdTotals {
            gross_income,
            pre_tax_deductions: person1.pre_tax_deductions + person2.pre_tax_deductions,
            total_tax,
            net_income: person1.net_income + person2.net_income,
            effective_rate: TaxEngine::effective_rate(total_tax, gross_income),
            marginal_rate: self.engine.marginal_rate(
                combined_taxable,
                household.filing_status,
                &household.state,
            )?,
        })
    }

    /// Monthly total of every expense, rounded to the cent.
    pub fn expenses_total(
        &self,
        tree: &ExpenseCategoryTree,
    ) -> Decimal {
        round_half_up(categorizer::expenses_total(tree, None))
    }

    /// Category breakdowns against the household's monthly net income.
    pub fn ramit_breakdown(
        &self,
        tree: &ExpenseCategoryTree,
        annual_net_income: Decimal,
    ) -> CategoryBreakdowns {
        categorizer::breakdown(tree, annual_net_income / MONTHS_PER_YEAR, None)
    }

    /// Monthly cash-flow summary for the two members and the household's
    /// monthly expenses.
    pub fn summary_metrics(
        &self,
        person1: &TaxResult,
        person2: &TaxResult,
        monthly_expenses: Decimal,
    ) -> Result<SummaryMetrics, TaxError> {
        let monthly_net_income = monthly(person1.net_income + person2.net_income);
        let monthly_expenses = round_half_up(monthly_expenses);
        let monthly_surplus = monthly_net_income - monthly_expenses;
        let annual_surplus = monthly_surplus
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(TaxError::AmountOverflow("annual surplus"))?;

        Ok(SummaryMetrics {
            monthly_net_income,
            monthly_expenses,
            monthly_surplus,
            annual_surplus,
            savings_rate: percent_of(monthly_surplus, monthly_net_income),
        })
    }

    /// One member's side of an already calculated scenario. Shared expenses
    /// are split evenly; taxes are taken from `result`, not recomputed.
    pub fn person_view(
        &self,
        person: PersonId,
        scenario: &Scenario,
        result: &HouseholdResult,
    ) -> PersonView {
        let income = result.person(person).clone();
        let annual_net = income.taxes.net_income;
        let monthly_net_income = monthly(annual_net);
        let monthly_expenses =
            round_half_up(categorizer::expenses_total(&scenario.expenses, Some(person)));

        PersonView {
            person,
            categories: categorizer::breakdown(
                &scenario.expenses,
                annual_net / MONTHS_PER_YEAR,
                Some(person),
            ),
            monthly_net_income,
            monthly_expenses,
            monthly_surplus: monthly_net_income - monthly_expenses,
            income,
        }
    }
}
