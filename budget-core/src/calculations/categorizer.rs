//! Expense totals per conscious-spending category.
//!
//! One traversal serves both the household view and the per-person view:
//!
//! | Filter       | Leaf assigned to | Counted |
//! |--------------|------------------|---------|
//! | none         | anyone           | full    |
//! | person       | that person      | full    |
//! | person       | shared           | half    |
//! | person       | the other person | skipped |

use rust_decimal::Decimal;

use crate::calculations::common::{percent_of, round_half_up};
use crate::models::{
    Assignee, Category, CategoryBreakdown, CategoryBreakdowns, ExpenseCategoryTree, ExpenseNode,
    PersonId,
};

/// Monthly total of every leaf under `node`, optionally seen from one
/// member's side.
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::{Assignee, ExpenseNode, PersonId};
/// use budget_core::calculations::categorizer::category_total;
///
/// let node = ExpenseNode::branch([
///     ("rent", ExpenseNode::leaf(dec!(2000), Assignee::Shared)),
///     ("gym", ExpenseNode::leaf(dec!(50), Assignee::Person2)),
/// ]);
///
/// assert_eq!(category_total(&node, None), dec!(2050));
/// assert_eq!(category_total(&node, Some(PersonId::Person1)), dec!(1000));
/// assert_eq!(category_total(&node, Some(PersonId::Person2)), dec!(1050));
/// ```
pub fn category_total(
    node: &ExpenseNode,
    person: Option<PersonId>,
) -> Decimal {
    match node {
        ExpenseNode::Leaf(item) => match (person, item.assigned_to) {
            (None, _) => item.amount,
            (Some(_), Assignee::Shared) => item.amount / Decimal::TWO,
            (Some(person), assignee) if Assignee::from(person) == assignee => item.amount,
            (Some(_), _) => Decimal::ZERO,
        },
        ExpenseNode::Branch(children) => children
            .values()
            .map(|child| category_total(child, person))
            .sum(),
    }
}

/// Monthly total across all four categories.
pub fn expenses_total(
    tree: &ExpenseCategoryTree,
    person: Option<PersonId>,
) -> Decimal {
    Category::ALL
        .into_iter()
        .map(|category| category_total(tree.branch(category), person))
        .sum()
}

/// Measures each category against `monthly_net`.
pub fn breakdown(
    tree: &ExpenseCategoryTree,
    monthly_net: Decimal,
    person: Option<PersonId>,
) -> CategoryBreakdowns {
    let measure = |category: Category| {
        let amount = category_total(tree.branch(category), person);
        CategoryBreakdown {
            category,
            amount: round_half_up(amount),
            percentage: percent_of(amount, monthly_net),
            target: category.target(),
        }
    };

    CategoryBreakdowns {
        fixed_costs: measure(Category::FixedCosts),
        investments: measure(Category::Investments),
        savings: measure(Category::Savings),
        guilt_free_spending: measure(Category::GuiltFreeSpending),
    }
}
