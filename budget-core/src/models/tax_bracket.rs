use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::TaxError;

/// One tier of a progressive schedule. `max_income` is exclusive; `None`
/// marks the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    /// Portion of `taxable_income` that falls inside this bracket.
    pub fn income_in_bracket(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let ceiling = match self.max_income {
            Some(max) => taxable_income.min(max),
            None => taxable_income,
        };
        (ceiling - self.min_income).max(Decimal::ZERO)
    }

    /// Checks that a schedule is non-empty, starts at zero, is contiguous and
    /// ascending, carries rates in `[0, 1]`, and ends with an unbounded
    /// bracket.
    pub fn validate_schedule(brackets: &[TaxBracket]) -> Result<(), TaxError> {
        let first = brackets
            .first()
            .ok_or_else(|| TaxError::InvalidBracketSchedule("schedule is empty".to_string()))?;

        if first.min_income != Decimal::ZERO {
            return Err(TaxError::InvalidBracketSchedule(format!(
                "first bracket starts at {} instead of 0",
                first.min_income
            )));
        }

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(TaxError::InvalidBracketSchedule(format!(
                    "bracket {index} has rate {} outside [0, 1]",
                    bracket.tax_rate
                )));
            }

            match (bracket.max_income, brackets.get(index + 1)) {
                (Some(max), Some(next)) => {
                    if max <= bracket.min_income {
                        return Err(TaxError::InvalidBracketSchedule(format!(
                            "bracket {index} upper bound {max} is not above its lower bound {}",
                            bracket.min_income
                        )));
                    }
                    if next.min_income != max {
                        return Err(TaxError::InvalidBracketSchedule(format!(
                            "gap or overlap between {max} and {}",
                            next.min_income
                        )));
                    }
                }
                (None, Some(_)) => {
                    return Err(TaxError::InvalidBracketSchedule(format!(
                        "bracket {index} is unbounded but is not the last bracket"
                    )));
                }
                (Some(max), None) => {
                    return Err(TaxError::InvalidBracketSchedule(format!(
                        "last bracket is capped at {max}"
                    )));
                }
                (None, None) => {}
            }
        }

        Ok(())
    }
}
