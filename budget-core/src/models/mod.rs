mod expenses;
mod filing_status;
mod income;
mod results;
mod scenario;
mod state_tax_rule;
mod tax_bracket;
mod tax_tables;
mod tax_year_config;

pub use expenses::{Assignee, Category, ExpenseCategoryTree, ExpenseItem, ExpenseNode, TargetRange};
pub use filing_status::FilingStatus;
pub use income::{HouseholdIncome, PayFrequency, PersonId, PersonIncome, PreTaxDeductions};
pub use results::{
    CategoryBreakdown, CategoryBreakdowns, FicaBreakdown, HouseholdResult, HouseholdTotals,
    PersonResult, PersonView, SummaryMetrics, TaxResult,
};
pub use scenario::{
    ExpenseEdit, Household, HouseholdMember, MAX_AMOUNT, PersonIncomeUpdate, Scenario,
    ScenarioError, ScenarioMetadata, ScenarioUpdate,
};
pub use state_tax_rule::StateTaxRule;
pub use tax_bracket::TaxBracket;
pub use tax_tables::TaxTables;
pub use tax_year_config::TaxYearConfig;
