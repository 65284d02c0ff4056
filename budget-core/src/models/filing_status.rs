use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculations::TaxError;

/// Filing status used to select the federal bracket schedule and the
/// standard deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
    ];

    /// Short code used in CSV tables and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
        }
    }

    /// The key used in persisted scenarios.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedFilingJointly => "marriedFilingJointly",
            Self::MarriedFilingSeparately => "marriedFilingSeparately",
            Self::HeadOfHousehold => "headOfHousehold",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
        }
    }

    /// Accepts either the short code (`MFJ`) or the persisted key
    /// (`marriedFilingJointly`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s) || status.key() == s)
    }
}

impl FromStr for FilingStatus {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TaxError::InvalidFilingStatus(s.to_string()))
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_short_codes() {
        assert_eq!(FilingStatus::parse("MFJ"), Some(FilingStatus::MarriedFilingJointly));
        assert_eq!(FilingStatus::parse("hoh"), Some(FilingStatus::HeadOfHousehold));
    }

    #[test]
    fn parse_accepts_persisted_keys() {
        assert_eq!(
            FilingStatus::parse("marriedFilingSeparately"),
            Some(FilingStatus::MarriedFilingSeparately)
        );
    }

    #[test]
    fn from_str_rejects_unknown_status() {
        let result = "widowed".parse::<FilingStatus>();

        assert_eq!(result, Err(TaxError::InvalidFilingStatus("widowed".to_string())));
    }

    #[test]
    fn serializes_as_camel_case_key() {
        let json = serde_json::to_string(&FilingStatus::HeadOfHousehold).unwrap();

        assert_eq!(json, "\"headOfHousehold\"");
    }
}
