use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::TaxError;

/// Payroll tax parameters for a tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub ss_wage_base: Decimal,
    pub ss_tax_rate: Decimal,
    pub medicare_tax_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold: Decimal,
}

impl TaxYearConfig {
    /// 2025 employee-side FICA parameters.
    pub fn for_2025() -> Self {
        Self {
            tax_year: 2025,
            ss_wage_base: Decimal::from(176_100),
            ss_tax_rate: Decimal::new(62, 3),
            medicare_tax_rate: Decimal::new(145, 4),
            additional_medicare_rate: Decimal::new(9, 3),
            additional_medicare_threshold: Decimal::from(200_000),
        }
    }

    /// Checks that every rate lies in [0, 1] and the amounts are not
    /// negative.
    pub fn validate(&self) -> Result<(), TaxError> {
        let rates = [
            ("ssTaxRate", self.ss_tax_rate),
            ("medicareTaxRate", self.medicare_tax_rate),
            ("additionalMedicareRate", self.additional_medicare_rate),
        ];
        for (field, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(TaxError::InvalidPayrollConfig(format!("{field} {rate} is outside 0..=1")));
            }
        }

        let amounts = [
            ("ssWageBase", self.ss_wage_base),
            ("additionalMedicareThreshold", self.additional_medicare_threshold),
        ];
        for (field, amount) in amounts {
            if amount < Decimal::ZERO {
                return Err(TaxError::InvalidPayrollConfig(format!("{field} {amount} is negative")));
            }
        }
        Ok(())
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::for_2025()
    }
}
