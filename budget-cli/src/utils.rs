use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount '{0}' must not be negative")]
    Negative(String),
}

/// Trims whitespace and drops `$` and `,` so `"$1,234.56"` parses.
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace([',', '$'], "")
}

/// Parses a money amount from the command line.
///
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseDecimalError::Invalid {
        input: s.to_string(),
        source: e,
    })
}

/// Like [`parse_decimal`] but rejects negative amounts. Used for income,
/// deduction and expense flags.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseDecimalError> {
    let amount = parse_decimal(s)?;
    if amount < Decimal::ZERO {
        return Err(ParseDecimalError::Negative(s.trim().to_string()));
    }
    Ok(amount)
}

/// Formats `amount` as dollars with thousands separators, e.g. `$12,345.67`
/// or `-$40.00`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{cents}")
}

/// Formats a percentage value (already scaled to 0..100) with one decimal.
pub fn format_percent(value: Decimal) -> String {
    format!(
        "{:.1}%",
        value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // parse_decimal
    // =========================================================================

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_strips_dollar_sign_and_whitespace() {
        assert_eq!(parse_decimal("  $95,000  ").unwrap(), dec!(95000));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        let err = parse_decimal("abc").unwrap_err();
        assert!(err.to_string().contains("'abc'"), "got {err}");
    }

    #[test]
    fn parse_amount_rejects_negative_values() {
        let err = parse_amount("-50,000").unwrap_err();

        assert!(matches!(err, ParseDecimalError::Negative(_)));
        assert_eq!(err.to_string(), "amount '-50,000' must not be negative");
    }

    #[test]
    fn parse_amount_accepts_zero_and_positive() {
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("$1,200.50").unwrap(), dec!(1200.50));
        assert!(matches!(parse_amount("ten"), Err(ParseDecimalError::Invalid { .. })));
    }

    // =========================================================================
    // format_money / format_percent
    // =========================================================================

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(dec!(0)), "$0.00");
        assert_eq!(format_money(dec!(999.5)), "$999.50");
        assert_eq!(format_money(dec!(1000)), "$1,000.00");
        assert_eq!(format_money(dec!(34546.37)), "$34,546.37");
        assert_eq!(format_money(dec!(1234567.891)), "$1,234,567.89");
    }

    #[test]
    fn format_money_puts_sign_before_dollar() {
        assert_eq!(format_money(dec!(-2565.08)), "-$2,565.08");
        assert_eq!(format_money(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn format_percent_rounds_to_one_place() {
        assert_eq!(format_percent(dec!(15.22)), "15.2%");
        assert_eq!(format_percent(dec!(31.25)), "31.3%");
        assert_eq!(format_percent(dec!(0)), "0.0%");
    }
}
