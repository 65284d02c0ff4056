use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A member of a two-person household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonId {
    Person1,
    Person2,
}

impl PersonId {
    pub const ALL: [PersonId; 2] = [Self::Person1, Self::Person2];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Person1 => "person1",
            Self::Person2 => "person2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "person1" | "1" => Some(Self::Person1),
            "person2" | "2" => Some(Self::Person2),
            _ => None,
        }
    }
}

impl fmt::Display for PersonId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How often a member is paid. Only affects the per-paycheck net figure.
///
/// Unrecognised values read from persisted data become [`PayFrequency::Biweekly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PayFrequency {
    Weekly,
    #[default]
    Biweekly,
    Semimonthly,
    Monthly,
}

impl PayFrequency {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Semimonthly => "semimonthly",
            Self::Monthly => "monthly",
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Weekly => 52,
            Self::Biweekly => 26,
            Self::Semimonthly => 24,
            Self::Monthly => 12,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "semimonthly" => Self::Semimonthly,
            "monthly" => Self::Monthly,
            _ => Self::Biweekly,
        }
    }
}

impl From<String> for PayFrequency {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PayFrequency> for String {
    fn from(value: PayFrequency) -> Self {
        value.key().to_string()
    }
}

/// Named pre-tax payroll deductions, all annual.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreTaxDeductions {
    pub retirement_401k: Decimal,
    pub health_insurance: Decimal,
    pub hsa: Decimal,
    pub other: Decimal,
}

impl PreTaxDeductions {
    pub fn total(&self) -> Decimal {
        self.retirement_401k + self.health_insurance + self.hsa + self.other
    }
}

/// Annual income figures for one household member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonIncome {
    pub salary: Decimal,
    pub bonus: Decimal,
    pub other_income: Decimal,
    pub pay_frequency: PayFrequency,
    pub pre_tax_deductions: PreTaxDeductions,
}

impl PersonIncome {
    /// Salary, bonus and other income. `None` if the sum overflows.
    pub fn gross(&self) -> Option<Decimal> {
        self.salary
            .checked_add(self.bonus)?
            .checked_add(self.other_income)
    }
}

/// Income for both members. A missing `person2` is treated as all zeros.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseholdIncome {
    pub person1: PersonIncome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person2: Option<PersonIncome>,
}

impl HouseholdIncome {
    pub fn person(
        &self,
        person: PersonId,
    ) -> Option<&PersonIncome> {
        match person {
            PersonId::Person1 => Some(&self.person1),
            PersonId::Person2 => self.person2.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn unknown_pay_frequency_defaults_to_biweekly() {
        let frequency: PayFrequency = serde_json::from_str("\"fortnightly-ish\"").unwrap();

        assert_eq!(frequency, PayFrequency::Biweekly);
        assert_eq!(frequency.periods_per_year(), 26);
    }

    #[test]
    fn pay_frequency_serializes_as_key() {
        let json = serde_json::to_string(&PayFrequency::Semimonthly).unwrap();

        assert_eq!(json, "\"semimonthly\"");
    }

    #[test]
    fn deductions_total_sums_every_field() {
        let deductions = PreTaxDeductions {
            retirement_401k: dec!(18000),
            health_insurance: dec!(3600),
            hsa: dec!(4300),
            other: dec!(100),
        };

        assert_eq!(deductions.total(), dec!(26000));
    }

    #[test]
    fn missing_fields_deserialize_to_zero() {
        let income: PersonIncome = serde_json::from_str(r#"{"salary": 50000}"#).unwrap();

        assert_eq!(income.gross(), Some(dec!(50000)));
        assert_eq!(income.pre_tax_deductions.total(), dec!(0));
        assert_eq!(income.pay_frequency, PayFrequency::Biweekly);
    }

    #[test]
    fn gross_overflow_is_none() {
        let income = PersonIncome {
            salary: dec!(60000000000000000000000000000),
            bonus: dec!(60000000000000000000000000000),
            ..Default::default()
        };

        assert_eq!(income.gross(), None);
    }

    #[test]
    fn missing_person2_reads_as_none() {
        let income: HouseholdIncome = serde_json::from_str(r#"{"person1": {}}"#).unwrap();

        assert_eq!(income.person(PersonId::Person2), None);
    }
}
