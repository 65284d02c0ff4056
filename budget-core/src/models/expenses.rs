use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PersonId;

/// Who an expense belongs to.
///
/// Unrecognised values read from persisted data become [`Assignee::Shared`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Assignee {
    Person1,
    Person2,
    #[default]
    Shared,
}

impl Assignee {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Person1 => "person1",
            Self::Person2 => "person2",
            Self::Shared => "shared",
        }
    }

    pub fn parse(s: &str) -> Self {
        match PersonId::parse(&s.trim().to_ascii_lowercase()) {
            Some(person) => person.into(),
            None => Self::Shared,
        }
    }
}

impl From<String> for Assignee {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Assignee> for String {
    fn from(value: Assignee) -> Self {
        value.key().to_string()
    }
}

impl From<PersonId> for Assignee {
    fn from(person: PersonId) -> Self {
        match person {
            PersonId::Person1 => Self::Person1,
            PersonId::Person2 => Self::Person2,
        }
    }
}

/// A monthly expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    pub amount: Decimal,
    #[serde(default)]
    pub assigned_to: Assignee,
}

impl ExpenseItem {
    pub fn new(
        amount: Decimal,
        assigned_to: Assignee,
    ) -> Self {
        Self {
            amount,
            assigned_to,
        }
    }

    pub fn shared(amount: Decimal) -> Self {
        Self::new(amount, Assignee::Shared)
    }
}

/// A node of the expense tree.
///
/// On the wire a leaf is an object with an `amount` field and any other
/// object is a branch keyed by sub-category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpenseNode {
    Leaf(ExpenseItem),
    Branch(BTreeMap<String, ExpenseNode>),
}

impl Default for ExpenseNode {
    fn default() -> Self {
        Self::Branch(BTreeMap::new())
    }
}

impl ExpenseNode {
    pub fn leaf(
        amount: Decimal,
        assigned_to: Assignee,
    ) -> Self {
        Self::Leaf(ExpenseItem::new(amount, assigned_to))
    }

    pub fn branch<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, ExpenseNode)>,
        K: Into<String>,
    {
        Self::Branch(
            children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    /// Follows `path` through nested branches.
    pub fn get(
        &self,
        path: &[&str],
    ) -> Option<&ExpenseNode> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => match self {
                Self::Branch(children) => children.get(*head)?.get(rest),
                Self::Leaf(_) => None,
            },
        }
    }

    pub fn get_mut(
        &mut self,
        path: &[&str],
    ) -> Option<&mut ExpenseNode> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => match self {
                Self::Branch(children) => children.get_mut(*head)?.get_mut(rest),
                Self::Leaf(_) => None,
            },
        }
    }

    /// The item at `path`, if that node is a leaf.
    pub fn leaf_at(
        &self,
        path: &[&str],
    ) -> Option<&ExpenseItem> {
        match self.get(path)? {
            Self::Leaf(item) => Some(item),
            Self::Branch(_) => None,
        }
    }

    /// Stores `item` at `path`, creating intermediate branches. A leaf sitting
    /// where a branch is needed is replaced by a branch. Returns `false` for
    /// an empty path.
    pub fn set_leaf(
        &mut self,
        path: &[&str],
        item: ExpenseItem,
    ) -> bool {
        let Some((last, parents)) = path.split_last() else {
            return false;
        };

        let mut node = self;
        for name in parents {
            if let Self::Leaf(_) = node {
                *node = Self::default();
            }
            let Self::Branch(children) = node else {
                return false;
            };
            node = children.entry((*name).to_string()).or_default();
        }

        if let Self::Leaf(_) = node {
            *node = Self::default();
        }
        match node {
            Self::Branch(children) => {
                children.insert((*last).to_string(), Self::Leaf(item));
                true
            }
            Self::Leaf(_) => false,
        }
    }

    /// Removes the node at `path` and returns it.
    pub fn remove(
        &mut self,
        path: &[&str],
    ) -> Option<ExpenseNode> {
        let (last, parents) = path.split_last()?;
        match self.get_mut(parents)? {
            Self::Branch(children) => children.remove(*last),
            Self::Leaf(_) => None,
        }
    }

    /// Multiplies the amount of the leaf at `path` by `factor`. Returns
    /// whether a leaf was found.
    pub fn scale_leaf(
        &mut self,
        path: &[&str],
        factor: Decimal,
    ) -> bool {
        match self.get_mut(path) {
            Some(Self::Leaf(item)) => {
                item.amount *= factor;
                true
            }
            _ => false,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Branch(children) => children.values().map(ExpenseNode::leaf_count).sum(),
        }
    }
}

/// Inclusive target range, in percent of monthly net income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl TargetRange {
    pub fn contains(
        &self,
        percentage: Decimal,
    ) -> bool {
        percentage >= self.min && percentage <= self.max
    }
}

/// The four conscious-spending categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    FixedCosts,
    Investments,
    Savings,
    GuiltFreeSpending,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Self::FixedCosts,
        Self::Investments,
        Self::Savings,
        Self::GuiltFreeSpending,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::FixedCosts => "fixedCosts",
            Self::Investments => "investments",
            Self::Savings => "savings",
            Self::GuiltFreeSpending => "guiltFreeSpending",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FixedCosts => "Fixed Costs",
            Self::Investments => "Investments",
            Self::Savings => "Savings",
            Self::GuiltFreeSpending => "Guilt-Free Spending",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == s.trim())
    }

    /// Fixed policy targets.
    pub fn target(&self) -> TargetRange {
        let (min, max) = match self {
            Self::FixedCosts => (50, 60),
            Self::Investments => (10, 10),
            Self::Savings => (5, 10),
            Self::GuiltFreeSpending => (20, 35),
        };
        TargetRange {
            min: Decimal::from(min),
            max: Decimal::from(max),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monthly expenses grouped under the four categories.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseCategoryTree {
    pub fixed_costs: ExpenseNode,
    pub investments: ExpenseNode,
    pub savings: ExpenseNode,
    pub guilt_free_spending: ExpenseNode,
}

impl ExpenseCategoryTree {
    pub fn branch(
        &self,
        category: Category,
    ) -> &ExpenseNode {
        match category {
            Category::FixedCosts => &self.fixed_costs,
            Category::Investments => &self.investments,
            Category::Savings => &self.savings,
            Category::GuiltFreeSpending => &self.guilt_free_spending,
        }
    }

    pub fn branch_mut(
        &mut self,
        category: Category,
    ) -> &mut ExpenseNode {
        match category {
            Category::FixedCosts => &mut self.fixed_costs,
            Category::Investments => &mut self.investments,
            Category::Savings => &mut self.savings,
            Category::GuiltFreeSpending => &mut self.guilt_free_spending,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn housing() -> ExpenseNode {
        ExpenseNode::branch([
            ("rent", ExpenseNode::leaf(dec!(2000), Assignee::Shared)),
            (
                "utilities",
                ExpenseNode::branch([
                    ("power", ExpenseNode::leaf(dec!(120), Assignee::Shared)),
                    ("water", ExpenseNode::leaf(dec!(60), Assignee::Person1)),
                ]),
            ),
        ])
    }

    #[test]
    fn leaf_json_is_read_as_leaf() {
        let node: ExpenseNode =
            serde_json::from_str(r#"{"amount": 250.5, "assignedTo": "person2"}"#).unwrap();

        assert_eq!(node, ExpenseNode::leaf(dec!(250.5), Assignee::Person2));
    }

    #[test]
    fn unknown_assignee_reads_as_shared() {
        let node: ExpenseNode = serde_json::from_str(
            r#"{"rent": {"amount": 2000, "assignedTo": "roommate"},
                "gym": {"amount": 40, "assignedTo": "person1"}}"#,
        )
        .unwrap();

        assert_eq!(node.leaf_at(&["rent"]), Some(&ExpenseItem::shared(dec!(2000))));
        assert_eq!(
            node.leaf_at(&["gym"]),
            Some(&ExpenseItem::new(dec!(40), Assignee::Person1))
        );
    }

    #[test]
    fn assignee_serializes_as_key() {
        let json = serde_json::to_value(ExpenseItem::new(dec!(5), Assignee::Person2)).unwrap();

        assert_eq!(json["assignedTo"], "person2");
    }

    #[test]
    fn leaf_without_assignee_is_shared() {
        let node: ExpenseNode = serde_json::from_str(r#"{"amount": 10}"#).unwrap();

        assert_eq!(node, ExpenseNode::leaf(dec!(10), Assignee::Shared));
    }

    #[test]
    fn nested_json_is_read_as_branches() {
        let node: ExpenseNode = serde_json::from_str(
            r#"{"rent": {"amount": 2000}, "utilities": {"power": {"amount": 120}}}"#,
        )
        .unwrap();

        assert_eq!(node.leaf_count(), 2);
        assert_eq!(
            node.leaf_at(&["utilities", "power"]),
            Some(&ExpenseItem::shared(dec!(120)))
        );
    }

    #[test]
    fn empty_object_is_an_empty_branch() {
        let node: ExpenseNode = serde_json::from_str("{}").unwrap();

        assert_eq!(node, ExpenseNode::default());
    }

    #[test]
    fn set_leaf_creates_missing_branches() {
        let mut node = ExpenseNode::default();

        assert!(node.set_leaf(&["transport", "car", "fuel"], ExpenseItem::shared(dec!(90))));
        assert_eq!(
            node.leaf_at(&["transport", "car", "fuel"]),
            Some(&ExpenseItem::shared(dec!(90)))
        );
    }

    #[test]
    fn set_leaf_replaces_leaf_in_the_way() {
        let mut node = housing();

        assert!(node.set_leaf(&["rent", "deposit"], ExpenseItem::shared(dec!(50))));
        assert_eq!(node.leaf_at(&["rent"]), None);
        assert_eq!(node.leaf_count(), 4);
    }

    #[test]
    fn set_leaf_rejects_empty_path() {
        let mut node = housing();

        assert!(!node.set_leaf(&[], ExpenseItem::shared(dec!(1))));
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut node = housing();

        let removed = node.remove(&["utilities"]);

        assert_eq!(removed.map(|n| n.leaf_count()), Some(2));
        assert_eq!(node.leaf_count(), 1);
    }

    #[test]
    fn scale_leaf_multiplies_amount() {
        let mut node = housing();

        assert!(node.scale_leaf(&["rent"], dec!(1.5)));
        assert!(!node.scale_leaf(&["utilities"], dec!(2)));
        assert_eq!(node.leaf_at(&["rent"]).map(|i| i.amount), Some(dec!(3000)));
    }

    #[test]
    fn target_ranges_match_policy() {
        assert_eq!(
            Category::Savings.target(),
            TargetRange {
                min: dec!(5),
                max: dec!(10)
            }
        );
        assert!(Category::Investments.target().contains(dec!(10)));
        assert!(!Category::Investments.target().contains(dec!(10.01)));
    }

    #[test]
    fn tree_missing_branches_default_to_empty() {
        let tree: ExpenseCategoryTree =
            serde_json::from_str(r#"{"savings": {"emergency": {"amount": 300}}}"#).unwrap();

        assert_eq!(tree.fixed_costs, ExpenseNode::default());
        assert_eq!(tree.branch(Category::Savings).leaf_count(), 1);
    }
}
