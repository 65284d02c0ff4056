use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    Category, ExpenseCategoryTree, ExpenseItem, ExpenseNode, FilingStatus, HouseholdIncome,
    PayFrequency, PersonId, PersonIncome,
};

/// Largest amount accepted for any income, deduction or expense field.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("{field} must not be negative (got {amount})")]
    NegativeAmount { field: String, amount: Decimal },

    #[error("{field} exceeds the maximum of {max} (got {amount})", max = MAX_AMOUNT)]
    AmountTooLarge { field: String, amount: Decimal },

    #[error("no expense at '{0}'")]
    ExpenseNotFound(String),

    #[error("expense path must not be empty")]
    EmptyExpensePath,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioMetadata {
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdMember {
    pub id: PersonId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Household {
    pub filing_status: FilingStatus,
    /// Two-letter state or locality code.
    pub state: String,
    pub members: Vec<HouseholdMember>,
}

impl Default for Household {
    fn default() -> Self {
        Self {
            filing_status: FilingStatus::Single,
            state: String::new(),
            members: Vec::new(),
        }
    }
}

impl Household {
    pub fn member_name(
        &self,
        person: PersonId,
    ) -> Option<&str> {
        self.members
            .iter()
            .find(|member| member.id == person)
            .map(|member| member.name.as_str())
    }
}

/// A complete, named snapshot of household inputs.
///
/// Every section defaults when absent, so partially entered data still
/// deserializes and calculates as zeros.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
    pub metadata: ScenarioMetadata,
    pub household: Household,
    pub income: HouseholdIncome,
    pub expenses: ExpenseCategoryTree,
}

impl Scenario {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// A copy of this scenario under a new identity.
    pub fn renamed(
        &self,
        name: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: ScenarioMetadata {
                name: name.to_string(),
                description: description.to_string(),
                created: now,
                modified: now,
            },
            ..self.clone()
        }
    }

    /// Checks that every income, deduction and expense amount lies in
    /// `0..=MAX_AMOUNT`. The error names the first offending field.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        check_income("person1", &self.income.person1)?;
        if let Some(person2) = &self.income.person2 {
            check_income("person2", person2)?;
        }
        for category in Category::ALL {
            check_expenses(category.key(), self.expenses.branch(category))?;
        }
        Ok(())
    }
}

fn check_amount(
    field: &str,
    amount: Decimal,
) -> Result<(), ScenarioError> {
    if amount < Decimal::ZERO {
        return Err(ScenarioError::NegativeAmount {
            field: field.to_string(),
            amount,
        });
    }
    if amount > MAX_AMOUNT {
        return Err(ScenarioError::AmountTooLarge {
            field: field.to_string(),
            amount,
        });
    }
    Ok(())
}

fn check_income(
    person: &str,
    income: &PersonIncome,
) -> Result<(), ScenarioError> {
    let deductions = &income.pre_tax_deductions;
    [
        ("salary", income.salary),
        ("bonus", income.bonus),
        ("otherIncome", income.other_income),
        ("preTaxDeductions.retirement401k", deductions.retirement_401k),
        ("preTaxDeductions.healthInsurance", deductions.health_insurance),
        ("preTaxDeductions.hsa", deductions.hsa),
        ("preTaxDeductions.other", deductions.other),
    ]
    .into_iter()
    .try_for_each(|(field, amount)| check_amount(&format!("{person}.{field}"), amount))
}

fn check_expenses(
    path: &str,
    node: &ExpenseNode,
) -> Result<(), ScenarioError> {
    match node {
        ExpenseNode::Leaf(item) => check_amount(path, item.amount),
        ExpenseNode::Branch(children) => children
            .iter()
            .try_for_each(|(name, child)| check_expenses(&format!("{path}/{name}"), child)),
    }
}

/// Field-level changes to one member's income.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PersonIncomeUpdate {
    pub salary: Option<Decimal>,
    pub bonus: Option<Decimal>,
    pub other_income: Option<Decimal>,
    pub pay_frequency: Option<PayFrequency>,
    pub retirement_401k: Option<Decimal>,
    pub health_insurance: Option<Decimal>,
    pub hsa: Option<Decimal>,
    pub other_deduction: Option<Decimal>,
}

impl PersonIncomeUpdate {
    pub fn apply(
        &self,
        income: &mut PersonIncome,
    ) {
        if let Some(salary) = self.salary {
            income.salary = salary;
        }
        if let Some(bonus) = self.bonus {
            income.bonus = bonus;
        }
        if let Some(other_income) = self.other_income {
            income.other_income = other_income;
        }
        if let Some(pay_frequency) = self.pay_frequency {
            income.pay_frequency = pay_frequency;
        }

        let deductions = &mut income.pre_tax_deductions;
        if let Some(amount) = self.retirement_401k {
            deductions.retirement_401k = amount;
        }
        if let Some(amount) = self.health_insurance {
            deductions.health_insurance = amount;
        }
        if let Some(amount) = self.hsa {
            deductions.hsa = amount;
        }
        if let Some(amount) = self.other_deduction {
            deductions.other = amount;
        }
    }
}

/// A single edit to the expense tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ExpenseEdit {
    Set {
        category: Category,
        path: Vec<String>,
        item: ExpenseItem,
    },
    Remove {
        category: Category,
        path: Vec<String>,
    },
}

impl ExpenseEdit {
    fn apply(
        &self,
        expenses: &mut ExpenseCategoryTree,
    ) -> Result<(), ScenarioError> {
        let (category, path) = match self {
            Self::Set { category, path, .. } | Self::Remove { category, path } => {
                (*category, path)
            }
        };
        if path.is_empty() {
            return Err(ScenarioError::EmptyExpensePath);
        }
        let keys: Vec<&str> = path.iter().map(String::as_str).collect();
        let branch = expenses.branch_mut(category);

        match self {
            Self::Set { item, .. } => {
                if !branch.set_leaf(&keys, item.clone()) {
                    return Err(ScenarioError::EmptyExpensePath);
                }
            }
            Self::Remove { .. } => {
                if branch.remove(&keys).is_none() {
                    return Err(ScenarioError::ExpenseNotFound(format!(
                        "{}/{}",
                        category.key(),
                        path.join("/")
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A typed partial update. Only the fields listed here can change; unknown
/// keys are rejected when the update is read from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ScenarioUpdate {
    pub description: Option<String>,
    pub filing_status: Option<FilingStatus>,
    pub state: Option<String>,
    pub members: Option<Vec<HouseholdMember>>,
    pub person1: Option<PersonIncomeUpdate>,
    pub person2: Option<PersonIncomeUpdate>,
    pub remove_person2: bool,
    pub expense_branches: Vec<(Category, ExpenseNode)>,
    pub expense_edits: Vec<ExpenseEdit>,
}

impl ScenarioUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the update in place and validates the result. Metadata
    /// timestamps are left to the caller.
    ///
    /// On error `scenario` may be partly updated; apply to a copy to keep
    /// the original.
    pub fn apply(
        &self,
        scenario: &mut Scenario,
    ) -> Result<(), ScenarioError> {
        if let Some(description) = &self.description {
            scenario.metadata.description = description.clone();
        }
        if let Some(filing_status) = self.filing_status {
            scenario.household.filing_status = filing_status;
        }
        if let Some(state) = &self.state {
            scenario.household.state = state.trim().to_ascii_uppercase();
        }
        if let Some(members) = &self.members {
            scenario.household.members = members.clone();
        }

        if let Some(update) = &self.person1 {
            update.apply(&mut scenario.income.person1);
        }
        if self.remove_person2 {
            scenario.income.person2 = None;
        } else if let Some(update) = &self.person2 {
            update.apply(scenario.income.person2.get_or_insert_with(PersonIncome::default));
        }

        for (category, node) in &self.expense_branches {
            *scenario.expenses.branch_mut(*category) = node.clone();
        }
        for edit in &self.expense_edits {
            edit.apply(&mut scenario.expenses)?;
        }
        scenario.validate()
    }
}
