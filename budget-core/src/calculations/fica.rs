//! Employee-side FICA (payroll) tax.
//!
//! | Component           | Base                                    | Rate  |
//! |---------------------|-----------------------------------------|-------|
//! | Social Security     | wages up to the wage base ($176,100)    | 6.2%  |
//! | Medicare            | all wages                               | 1.45% |
//! | Additional Medicare | wages above the threshold ($200,000)    | 0.9%  |
//!
//! Each component is rounded to the cent on its own; the total is the rounded
//! sum of the rounded components.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::TaxYearConfig;
//! use budget_core::calculations::PayrollTaxCalculator;
//!
//! let config = TaxYearConfig::for_2025();
//! let fica = PayrollTaxCalculator::new(&config).calculate(dec!(250000));
//!
//! assert_eq!(fica.social_security, dec!(10918.20));
//! assert_eq!(fica.medicare, dec!(3625.00));
//! assert_eq!(fica.additional_medicare, dec!(450.00));
//! assert_eq!(fica.total, dec!(14993.20));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{FicaBreakdown, TaxYearConfig};

/// Calculator for the employee share of Social Security and Medicare.
#[derive(Debug, Clone)]
pub struct PayrollTaxCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> PayrollTaxCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Computes the FICA breakdown for a year's wages. Negative wages are
    /// treated as zero.
    pub fn calculate(
        &self,
        gross_wages: Decimal,
    ) -> FicaBreakdown {
        let wages = if gross_wages < Decimal::ZERO {
            warn!(
                gross_wages = %gross_wages,
                "Wages are negative; FICA computed on zero"
            );
            Decimal::ZERO
        } else {
            gross_wages
        };

        let social_security = self.social_security_tax(wages);
        let medicare = self.medicare_tax(wages);
        let additional_medicare = self.additional_medicare_tax(wages);

        FicaBreakdown {
            social_security,
            medicare,
            additional_medicare,
            total: round_half_up(social_security + medicare + additional_medicare),
        }
    }

    /// Social Security tax on wages up to the wage base.
    fn social_security_tax(
        &self,
        wages: Decimal,
    ) -> Decimal {
        round_half_up(wages.min(self.config.ss_wage_base) * self.config.ss_tax_rate)
    }

    /// Medicare tax on all wages; there is no wage base.
    fn medicare_tax(
        &self,
        wages: Decimal,
    ) -> Decimal {
        round_half_up(wages * self.config.medicare_tax_rate)
    }

    /// Additional Medicare tax on wages above the threshold.
    fn additional_medicare_tax(
        &self,
        wages: Decimal,
    ) -> Decimal {
        let excess = wages - self.config.additional_medicare_threshold;
        if excess <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_half_up(excess * self.config.additional_medicare_rate)
    }
}
