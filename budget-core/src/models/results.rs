//! Derived figures produced by the calculators. Nothing here is persisted.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{Category, PayFrequency, PersonId, TargetRange};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FicaBreakdown {
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub additional_medicare: Decimal,
    pub total: Decimal,
}

/// Full tax breakdown for one earner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub gross_income: Decimal,
    pub pre_tax_deductions: Decimal,
    pub standard_deduction: Decimal,
    /// Never negative.
    pub taxable_income: Decimal,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub fica: FicaBreakdown,
    pub total_tax: Decimal,
    /// Not clamped; may be negative if taxes exceed income after deductions.
    pub net_income: Decimal,
    /// Percent of gross income.
    pub effective_rate: Decimal,
    /// Combined federal and state marginal rate, in percent.
    pub marginal_rate: Decimal,
}

/// A member's tax result together with their take-home pay per paycheck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResult {
    pub person: PersonId,
    pub pay_frequency: PayFrequency,
    pub net_per_paycheck: Decimal,
    pub taxes: TaxResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdTotals {
    pub gross_income: Decimal,
    pub pre_tax_deductions: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
}

/// One conscious-spending category measured against monthly net income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: Category,
    /// Monthly amount.
    pub amount: Decimal,
    pub percentage: Decimal,
    pub target: TargetRange,
}

impl CategoryBreakdown {
    pub fn is_within_target(&self) -> bool {
        self.target.contains(self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdowns {
    pub fixed_costs: CategoryBreakdown,
    pub investments: CategoryBreakdown,
    pub savings: CategoryBreakdown,
    pub guilt_free_spending: CategoryBreakdown,
}

impl CategoryBreakdowns {
    pub fn get(
        &self,
        category: Category,
    ) -> &CategoryBreakdown {
        match category {
            Category::FixedCosts => &self.fixed_costs,
            Category::Investments => &self.investments,
            Category::Savings => &self.savings,
            Category::GuiltFreeSpending => &self.guilt_free_spending,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryBreakdown> {
        Category::ALL.into_iter().map(|category| self.get(category))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub monthly_net_income: Decimal,
    pub monthly_expenses: Decimal,
    pub monthly_surplus: Decimal,
    pub annual_surplus: Decimal,
    pub savings_rate: Decimal,
}

/// The consolidated output of one household calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdResult {
    pub person1: PersonResult,
    pub person2: PersonResult,
    pub household: HouseholdTotals,
    /// Monthly total across every category.
    pub expenses_total: Decimal,
    pub categories: CategoryBreakdowns,
    pub summary: SummaryMetrics,
}

impl HouseholdResult {
    pub fn person(
        &self,
        person: PersonId,
    ) -> &PersonResult {
        match person {
            PersonId::Person1 => &self.person1,
            PersonId::Person2 => &self.person2,
        }
    }
}

/// Figures for one member, with shared expenses split evenly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
    pub person: PersonId,
    pub income: PersonResult,
    pub categories: CategoryBreakdowns,
    pub monthly_net_income: Decimal,
    pub monthly_expenses: Decimal,
    pub monthly_surplus: Decimal,
}
