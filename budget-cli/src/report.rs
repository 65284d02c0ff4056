//! Plain-text reports printed by the `summary`, `person` and `list`
//! commands.
//!
//! Each report is a small borrowing wrapper that implements
//! [`Display`](fmt::Display), so callers can `println!("{report}")` or
//! `to_string()` it in tests.

use std::fmt;

use budget_core::{
    CategoryBreakdown, CategoryBreakdowns, FicaBreakdown, HouseholdResult, PersonId, PersonView,
    Scenario, ScenarioStore, TargetRange, TaxResult,
};

use crate::utils::{format_money, format_percent};

const LABEL_WIDTH: usize = 24;
const COLUMN_WIDTH: usize = 16;

fn row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    values: &[String],
) -> fmt::Result {
    write!(f, "{label:<LABEL_WIDTH$}")?;
    for value in values {
        write!(f, "{value:>COLUMN_WIDTH$}")?;
    }
    writeln!(f)
}

fn member_label(
    scenario: &Scenario,
    person: PersonId,
) -> String {
    match scenario.household.member_name(person) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => match person {
            PersonId::Person1 => "Person 1".to_string(),
            PersonId::Person2 => "Person 2".to_string(),
        },
    }
}

fn heading(
    f: &mut fmt::Formatter<'_>,
    scenario: &Scenario,
) -> fmt::Result {
    let metadata = &scenario.metadata;
    if metadata.description.is_empty() {
        writeln!(f, "{}", metadata.name)?;
    } else {
        writeln!(f, "{}: {}", metadata.name, metadata.description)?;
    }

    let state = match scenario.household.state.as_str() {
        "" => "no state",
        state => state,
    };
    writeln!(f, "{}, {}", scenario.household.filing_status.label(), state)
}

fn target_text(target: TargetRange) -> String {
    if target.min == target.max {
        format!("{}%", target.min)
    } else {
        format!("{}-{}%", target.min, target.max)
    }
}

fn target_status(breakdown: &CategoryBreakdown) -> &'static str {
    if breakdown.is_within_target() {
        "on target"
    } else if breakdown.percentage < breakdown.target.min {
        "below target"
    } else {
        "above target"
    }
}

fn categories(
    f: &mut fmt::Formatter<'_>,
    breakdowns: &CategoryBreakdowns,
) -> fmt::Result {
    writeln!(f)?;
    row(
        f,
        "Conscious spending",
        &["Monthly".to_string(), "Share".to_string(), "Target".to_string()],
    )?;
    for breakdown in breakdowns.iter() {
        write!(f, "  {:<width$}", breakdown.category.label(), width = LABEL_WIDTH - 2)?;
        write!(
            f,
            "{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}",
            format_money(breakdown.amount),
            format_percent(breakdown.percentage),
            target_text(breakdown.target),
        )?;
        writeln!(f, "  {}", target_status(breakdown))?;
    }
    Ok(())
}

fn column(
    results: &[&TaxResult],
    value: impl Fn(&TaxResult) -> String,
) -> Vec<String> {
    results.iter().map(|result| value(result)).collect()
}

/// Tax lines shared by the household and person reports, one column per
/// result.
fn tax_lines(
    f: &mut fmt::Formatter<'_>,
    results: &[&TaxResult],
) -> fmt::Result {
    row(f, "Gross income", &column(results, |r| format_money(r.gross_income)))?;
    row(f, "Pre-tax deductions", &column(results, |r| format_money(r.pre_tax_deductions)))?;
    row(f, "Standard deduction", &column(results, |r| format_money(r.standard_deduction)))?;
    row(f, "Taxable income", &column(results, |r| format_money(r.taxable_income)))?;
    row(f, "Federal tax", &column(results, |r| format_money(r.federal_tax)))?;
    row(f, "State tax", &column(results, |r| format_money(r.state_tax)))?;
    row(f, "Social Security", &column(results, |r| format_money(r.fica.social_security)))?;
    row(
        f,
        "Medicare",
        &column(results, |r| format_money(r.fica.medicare + r.fica.additional_medicare)),
    )?;
    row(f, "Total tax", &column(results, |r| format_money(r.total_tax)))?;
    row(f, "Net income", &column(results, |r| format_money(r.net_income)))?;
    row(f, "Effective rate", &column(results, |r| format_percent(r.effective_rate)))?;
    row(f, "Marginal rate", &column(results, |r| format_percent(r.marginal_rate)))
}

/// Household report: both members side by side, household totals, monthly
/// cash flow and the conscious-spending breakdown.
pub struct HouseholdReport<'a> {
    pub scenario: &'a Scenario,
    pub result: &'a HouseholdResult,
}

impl fmt::Display for HouseholdReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let scenario = self.scenario;
        let result = self.result;
        let two_earners = scenario.income.person2.is_some();

        heading(f, scenario)?;
        writeln!(f)?;

        let mut people = vec![&result.person1];
        if two_earners {
            people.push(&result.person2);
        }

        let mut header: Vec<String> = people
            .iter()
            .map(|person| member_label(scenario, person.person))
            .collect();
        if two_earners {
            header.push("Household".to_string());
        }
        row(f, "", &header)?;

        // The household column repeats the totals; single earners have none.
        let household_tax = TaxResult {
            gross_income: result.household.gross_income,
            pre_tax_deductions: result.household.pre_tax_deductions,
            standard_deduction: result.person1.taxes.standard_deduction
                + result.person2.taxes.standard_deduction,
            taxable_income: result.person1.taxes.taxable_income
                + result.person2.taxes.taxable_income,
            federal_tax: result.person1.taxes.federal_tax + result.person2.taxes.federal_tax,
            state_tax: result.person1.taxes.state_tax + result.person2.taxes.state_tax,
            fica: FicaBreakdown {
                social_security: result.person1.taxes.fica.social_security
                    + result.person2.taxes.fica.social_security,
                medicare: result.person1.taxes.fica.medicare + result.person2.taxes.fica.medicare,
                additional_medicare: result.person1.taxes.fica.additional_medicare
                    + result.person2.taxes.fica.additional_medicare,
                total: result.person1.taxes.fica.total + result.person2.taxes.fica.total,
            },
            total_tax: result.household.total_tax,
            net_income: result.household.net_income,
            effective_rate: result.household.effective_rate,
            marginal_rate: result.household.marginal_rate,
        };

        let mut columns: Vec<&TaxResult> = people.iter().map(|person| &person.taxes).collect();
        if two_earners {
            columns.push(&household_tax);
        }
        tax_lines(f, &columns)?;

        let paychecks: Vec<String> = people
            .iter()
            .map(|person| format_money(person.net_per_paycheck))
            .collect();
        row(f, "Net per paycheck", &paychecks)?;
        let frequencies: Vec<String> = people
            .iter()
            .map(|person| person.pay_frequency.key().to_string())
            .collect();
        row(f, "Pay frequency", &frequencies)?;

        let summary = &result.summary;
        writeln!(f)?;
        writeln!(f, "Monthly cash flow")?;
        row(f, "  Net income", &[format_money(summary.monthly_net_income)])?;
        row(f, "  Expenses", &[format_money(summary.monthly_expenses)])?;
        row(f, "  Surplus", &[format_money(summary.monthly_surplus)])?;
        row(f, "  Annual surplus", &[format_money(summary.annual_surplus)])?;
        row(f, "  Savings rate", &[format_percent(summary.savings_rate)])?;

        categories(f, &result.categories)
    }
}

/// One member's taxes, take-home pay and their half of shared expenses.
pub struct PersonReport<'a> {
    pub scenario: &'a Scenario,
    pub view: &'a PersonView,
}

impl fmt::Display for PersonReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let view = self.view;
        let income = &view.income;

        heading(f, self.scenario)?;
        writeln!(f)?;
        row(f, "", &[member_label(self.scenario, view.person)])?;
        tax_lines(f, &[&income.taxes])?;
        row(f, "Net per paycheck", &[format_money(income.net_per_paycheck)])?;
        row(
            f,
            "Pay frequency",
            &[format!(
                "{} ({}/yr)",
                income.pay_frequency.key(),
                income.pay_frequency.periods_per_year()
            )],
        )?;

        writeln!(f)?;
        writeln!(f, "Monthly cash flow (shared expenses split evenly)")?;
        row(f, "  Net income", &[format_money(view.monthly_net_income)])?;
        row(f, "  Expenses", &[format_money(view.monthly_expenses)])?;
        row(f, "  Surplus", &[format_money(view.monthly_surplus)])?;

        categories(f, &view.categories)
    }
}

/// Every stored scenario, the current one marked with `*`.
pub struct ScenarioList<'a> {
    pub store: &'a ScenarioStore,
}

impl fmt::Display for ScenarioList<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let width = self.store.names().map(str::len).max().unwrap_or(0);
        for name in self.store.names() {
            let Some(scenario) = self.store.get(name) else {
                continue;
            };
            let marker = if name == self.store.current_name() { '*' } else { ' ' };
            writeln!(
                f,
                "{marker} {name:<width$}  {:<10}  {}",
                scenario.metadata.modified.format("%Y-%m-%d"),
                scenario.metadata.description,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use budget_core::store::BASELINE;
    use budget_core::{
        ExpenseCategoryTree, FilingStatus, Household, HouseholdCalculator, HouseholdIncome,
        PayFrequency, PersonIncome, TaxTables,
    };
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn single_renter() -> Scenario {
        let mut scenario = Scenario::default();
        scenario.metadata.name = "single-renter".to_string();
        scenario.metadata.description = "One earner in Texas".to_string();
        scenario.household = Household {
            filing_status: FilingStatus::Single,
            state: "TX".to_string(),
            members: Vec::new(),
        };
        scenario.income = HouseholdIncome {
            person1: PersonIncome {
                salary: dec!(100000),
                pay_frequency: PayFrequency::Semimonthly,
                ..Default::default()
            },
            person2: None,
        };
        scenario.expenses = ExpenseCategoryTree::default();
        scenario
    }

    fn line_with<'a>(
        report: &'a str,
        label: &str,
    ) -> &'a str {
        report
            .lines()
            .find(|line| line.trim_start().starts_with(label.trim_start()))
            .unwrap_or_else(|| panic!("no '{label}' line in:\n{report}"))
    }

    // =========================================================================
    // HouseholdReport
    // =========================================================================

    #[test]
    fn single_earner_report_has_one_column() {
        let tables = TaxTables::for_2025();
        let scenario = single_renter();
        let result = HouseholdCalculator::new(&tables)
            .calculate_scenario(&scenario)
            .unwrap();

        let report = HouseholdReport {
            scenario: &scenario,
            result: &result,
        }
        .to_string();

        assert!(report.starts_with("single-renter: One earner in Texas\nSingle, TX\n"));
        assert!(!report.contains("Household"), "got:\n{report}");
        assert_eq!(
            line_with(&report, "Taxable income").split_whitespace().last(),
            Some("$85,000.00")
        );
        assert_eq!(
            line_with(&report, "Net per paycheck").split_whitespace().last(),
            Some(format_money(result.person1.net_per_paycheck).as_str())
        );
        assert_eq!(
            line_with(&report, "Pay frequency").split_whitespace().last(),
            Some("semimonthly")
        );
    }

    #[test]
    fn two_earner_report_adds_household_column() {
        let tables = TaxTables::for_2025();
        let store = ScenarioStore::with_defaults();
        let scenario = store.current();
        let result = HouseholdCalculator::new(&tables)
            .calculate_scenario(scenario)
            .unwrap();

        let report = HouseholdReport { scenario, result: &result }.to_string();

        let header = report.lines().nth(3).unwrap();
        assert_eq!(
            header.split_whitespace().collect::<Vec<_>>(),
            vec!["Person", "1", "Person", "2", "Household"]
        );
        let total_tax: Vec<&str> = line_with(&report, "Total tax").split_whitespace().collect();
        assert_eq!(total_tax.last().copied(), Some(format_money(result.household.total_tax).as_str()));
        assert_eq!(
            line_with(&report, "  Surplus").split_whitespace().last(),
            Some(format_money(result.summary.monthly_surplus).as_str())
        );
    }

    #[test]
    fn empty_categories_are_reported_below_target() {
        let tables = TaxTables::for_2025();
        let scenario = single_renter();
        let result = HouseholdCalculator::new(&tables)
            .calculate_scenario(&scenario)
            .unwrap();

        let report = HouseholdReport {
            scenario: &scenario,
            result: &result,
        }
        .to_string();

        let fixed = line_with(&report, "Fixed Costs");
        assert!(fixed.contains("$0.00"), "got {fixed}");
        assert!(fixed.contains("50-60%"), "got {fixed}");
        assert!(fixed.ends_with("below target"), "got {fixed}");
        assert!(line_with(&report, "Investments").contains(" 10%"));
    }

    // =========================================================================
    // PersonReport
    // =========================================================================

    #[test]
    fn person_report_uses_member_name_and_split_expenses() {
        let tables = TaxTables::for_2025();
        let store = ScenarioStore::with_defaults();
        let scenario = store.current();
        let calculator = HouseholdCalculator::new(&tables);
        let result = calculator.calculate_scenario(scenario).unwrap();
        let view = calculator.person_view(PersonId::Person2, scenario, &result);

        let report = PersonReport {
            scenario,
            view: &view,
        }
        .to_string();

        assert_eq!(report.lines().nth(3).map(str::trim), Some("Person 2"));
        assert_eq!(
            line_with(&report, "  Expenses").split_whitespace().last(),
            Some(format_money(view.monthly_expenses).as_str())
        );
        assert!(report.contains("(shared expenses split evenly)"));
    }

    // =========================================================================
    // ScenarioList
    // =========================================================================

    #[test]
    fn list_marks_current_scenario() {
        let mut store = ScenarioStore::with_defaults();
        store.create_scenario("move-to-texas", "Relocation", None).unwrap();
        store.switch_to("move-to-texas").unwrap();

        let list = ScenarioList { store: &store }.to_string();

        let current: Vec<&str> = list.lines().filter(|line| line.starts_with('*')).collect();
        assert_eq!(current.len(), 1);
        assert!(current[0].contains("move-to-texas"));
        assert!(current[0].ends_with("Relocation"));
        assert!(list.lines().any(|line| line.starts_with(&format!("  {BASELINE}"))));
        assert_eq!(list.lines().count(), store.len());
    }
}
