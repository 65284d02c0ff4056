use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// How a jurisdiction taxes income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StateTaxRule {
    None,
    Flat { rate: Decimal },
    Progressive { brackets: Vec<TaxBracket> },
}

impl StateTaxRule {
    pub fn flat(rate: Decimal) -> Self {
        Self::Flat { rate }
    }

    pub fn progressive(brackets: Vec<TaxBracket>) -> Self {
        Self::Progressive { brackets }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Flat { .. } => "flat",
            Self::Progressive { .. } => "progressive",
        }
    }
}
