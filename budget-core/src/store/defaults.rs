//! Built-in scenarios seeded into an empty store.
//!
//! `optimistic` and `conservative` are derived from `baseline` by scaling a
//! fixed set of fields:
//!
//! | Scenario     | Field                         | Factor |
//! |--------------|-------------------------------|--------|
//! | optimistic   | salaries, bonuses             | 1.20   |
//! | optimistic   | 401(k) contributions          | 1.25   |
//! | optimistic   | brokerage, emergency fund     | 1.50   |
//! | conservative | salaries                      | 0.85   |
//! | conservative | bonuses                       | 0.50   |
//! | conservative | dining, entertainment         | 0.60   |
//! | conservative | shopping                      | 0.50   |

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{
    Assignee, Category, ExpenseCategoryTree, ExpenseNode, FilingStatus, Household,
    HouseholdIncome, HouseholdMember, PayFrequency, PersonId, PersonIncome, PreTaxDeductions,
    Scenario, ScenarioMetadata,
};

pub const BASELINE: &str = "baseline";
pub const OPTIMISTIC: &str = "optimistic";
pub const CONSERVATIVE: &str = "conservative";

fn shared(amount: i64) -> ExpenseNode {
    ExpenseNode::leaf(Decimal::from(amount), Assignee::Shared)
}

fn each_person(amount: i64) -> ExpenseNode {
    ExpenseNode::branch([
        ("person1", ExpenseNode::leaf(Decimal::from(amount), Assignee::Person1)),
        ("person2", ExpenseNode::leaf(Decimal::from(amount), Assignee::Person2)),
    ])
}

fn baseline_expenses() -> ExpenseCategoryTree {
    ExpenseCategoryTree {
        fixed_costs: ExpenseNode::branch([
            (
                "housing",
                ExpenseNode::branch([("rent", shared(3200)), ("rentersInsurance", shared(25))]),
            ),
            (
                "utilities",
                ExpenseNode::branch([("electric", shared(120)), ("internet", shared(80))]),
            ),
            (
                "transportation",
                ExpenseNode::branch([
                    ("carPayment", ExpenseNode::leaf(Decimal::from(450), Assignee::Person1)),
                    ("carInsurance", shared(180)),
                    ("fuel", shared(200)),
                ]),
            ),
            ("groceries", shared(900)),
            ("phone", each_person(70)),
        ]),
        investments: ExpenseNode::branch([("brokerage", shared(1000)), ("rothIra", each_person(500))]),
        savings: ExpenseNode::branch([
            ("emergencyFund", shared(500)),
            ("vacation", shared(300)),
            ("gifts", shared(100)),
        ]),
        guilt_free_spending: ExpenseNode::branch([
            ("dining", shared(600)),
            ("entertainment", shared(200)),
            ("shopping", shared(400)),
            ("hobbies", each_person(150)),
        ]),
    }
}

/// Reference figures for a two-earner household.
pub fn baseline(now: DateTime<Utc>) -> Scenario {
    Scenario {
        metadata: ScenarioMetadata {
            name: BASELINE.to_string(),
            description: "Current household figures".to_string(),
            created: now,
            modified: now,
        },
        household: Household {
            filing_status: FilingStatus::MarriedFilingJointly,
            state: "CA".to_string(),
            members: vec![
                HouseholdMember {
                    id: PersonId::Person1,
                    name: "Person 1".to_string(),
                },
                HouseholdMember {
                    id: PersonId::Person2,
                    name: "Person 2".to_string(),
                },
            ],
        },
        income: HouseholdIncome {
            person1: PersonIncome {
                salary: Decimal::from(120_000),
                bonus: Decimal::from(10_000),
                other_income: Decimal::ZERO,
                pay_frequency: PayFrequency::Biweekly,
                pre_tax_deductions: PreTaxDeductions {
                    retirement_401k: Decimal::from(23_000),
                    health_insurance: Decimal::from(3_600),
                    hsa: Decimal::from(4_300),
                    other: Decimal::ZERO,
                },
            },
            person2: Some(PersonIncome {
                salary: Decimal::from(90_000),
                bonus: Decimal::from(5_000),
                other_income: Decimal::ZERO,
                pay_frequency: PayFrequency::Biweekly,
                pre_tax_deductions: PreTaxDeductions {
                    retirement_401k: Decimal::from(15_000),
                    health_insurance: Decimal::from(2_400),
                    hsa: Decimal::ZERO,
                    other: Decimal::ZERO,
                },
            }),
        },
        expenses: baseline_expenses(),
    }
}

fn scale_incomes(
    scenario: &mut Scenario,
    adjust: impl Fn(&mut PersonIncome),
) {
    adjust(&mut scenario.income.person1);
    if let Some(person2) = scenario.income.person2.as_mut() {
        adjust(person2);
    }
}

fn scale_expense(
    scenario: &mut Scenario,
    category: Category,
    path: &[&str],
    factor: Decimal,
) {
    if !scenario.expenses.branch_mut(category).scale_leaf(path, factor) {
        warn!(
            category = category.key(),
            path = %path.join("."),
            "Expense adjustment skipped; no leaf at path"
        );
    }
}

/// Higher income, contributions and savings.
pub fn optimistic(
    baseline: &Scenario,
    now: DateTime<Utc>,
) -> Scenario {
    let mut scenario = baseline.renamed(OPTIMISTIC, "Raises, bigger bonuses and more saved", now);
    let income_factor = Decimal::new(120, 2);
    let retirement_factor = Decimal::new(125, 2);
    let savings_factor = Decimal::new(150, 2);

    scale_incomes(&mut scenario, |income| {
        income.salary *= income_factor;
        income.bonus *= income_factor;
        income.pre_tax_deductions.retirement_401k *= retirement_factor;
    });
    scale_expense(&mut scenario, Category::Investments, &["brokerage"], savings_factor);
    scale_expense(&mut scenario, Category::Savings, &["emergencyFund"], savings_factor);
    scenario
}

/// Lower income and reduced discretionary spending.
pub fn conservative(
    baseline: &Scenario,
    now: DateTime<Utc>,
) -> Scenario {
    let mut scenario = baseline.renamed(CONSERVATIVE, "Pay cut, smaller bonuses and less spent", now);
    let salary_factor = Decimal::new(85, 2);
    let bonus_factor = Decimal::new(50, 2);
    let dining_factor = Decimal::new(60, 2);

    scale_incomes(&mut scenario, |income| {
        income.salary *= salary_factor;
        income.bonus *= bonus_factor;
    });
    scale_expense(&mut scenario, Category::GuiltFreeSpending, &["dining"], dining_factor);
    scale_expense(&mut scenario, Category::GuiltFreeSpending, &["entertainment"], dining_factor);
    scale_expense(&mut scenario, Category::GuiltFreeSpending, &["shopping"], bonus_factor);
    scenario
}

/// `baseline`, `optimistic` and `conservative`, in that order.
pub fn default_scenarios(now: DateTime<Utc>) -> Vec<Scenario> {
    let baseline = baseline(now);
    let optimistic = optimistic(&baseline, now);
    let conservative = conservative(&baseline, now);
    vec![baseline, optimistic, conservative]
}
