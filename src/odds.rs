//! Odds normalization: decimal, American and fractional quotes to decimal odds.

use thiserror::Error;
use tracing::warn;

/// Why a raw odds quote could not be converted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OddsFormatError {
    #[error("empty odds text")]
    Empty,

    #[error("not a number: {0}")]
    NotANumber(String),

    #[error("zero denominator in fractional odds: {0}")]
    ZeroDenominator(String),

    #[error("zero american odds: {0}")]
    ZeroAmerican(String),

    #[error("non-finite odds: {0}")]
    NonFinite(String),
}

/// Parse a raw quote into decimal odds rounded to 2 dp
pub fn parse_decimal(raw: &str) -> Result<f64, OddsFormatError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(OddsFormatError::Empty);
    }

    let value = if text.contains('.') {
        parse_number(text)?
    } else if let Some(rest) = text.strip_prefix('+') {
        let american = parse_whole(rest, text)?;
        american / 100.0 + 1.0
    } else if let Some(rest) = text.strip_prefix('-') {
        let american = parse_whole(rest, text)?;
        if american == 0.0 {
            return Err(OddsFormatError::ZeroAmerican(text.to_string()));
        }
        100.0 / american + 1.0
    } else if let Some((num, den)) = text.split_once('/') {
        let num = parse_whole(num.trim(), text)?;
        let den = parse_whole(den.trim(), text)?;
        if den == 0.0 {
            return Err(OddsFormatError::ZeroDenominator(text.to_string()));
        }
        num / den + 1.0
    } else {
        parse_number(text)?
    };

    if !value.is_finite() {
        return Err(OddsFormatError::NonFinite(text.to_string()));
    }
    Ok(round2(value))
}

/// Convert a raw quote to decimal odds, 0.0 on failure
pub fn to_decimal(raw: &str) -> f64 {
    match parse_decimal(raw) {
        Ok(odds) => odds,
        Err(e) => {
            warn!("[ODDS] Could not convert odds '{}': {}", raw, e);
            0.0
        }
    }
}

#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_number(text: &str) -> Result<f64, OddsFormatError> {
    text.parse::<f64>()
        .map_err(|_| OddsFormatError::NotANumber(text.to_string()))
}

/// American and fractional parts are whole numbers
fn parse_whole(part: &str, text: &str) -> Result<f64, OddsFormatError> {
    part.parse::<u32>()
        .map(f64::from)
        .map_err(|_| OddsFormatError::NotANumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_passthrough() {
        assert_eq!(to_decimal("2.10"), 2.1);
        assert_eq!(to_decimal(" 1.956 "), 1.96);
    }

    #[test]
    fn test_american_odds() {
        // +150 -> 150/100 + 1
        assert_eq!(to_decimal("+150"), 2.5);
        // -120 -> 100/120 + 1 = 1.8333
        assert_eq!(to_decimal("-120"), 1.83);
        assert_eq!(to_decimal("-100"), 2.0);
    }

    #[test]
    fn test_fractional_odds() {
        assert_eq!(to_decimal("5/2"), 3.5);
        assert_eq!(to_decimal("1/3"), 1.33);
        assert_eq!(to_decimal("evens"), 0.0);
    }

    #[test]
    fn test_plain_integer() {
        assert_eq!(to_decimal("3"), 3.0);
    }

    #[test]
    fn test_failures_yield_zero() {
        assert_eq!(to_decimal(""), 0.0);
        assert_eq!(to_decimal("N/A"), 0.0);
        assert_eq!(to_decimal("5/0"), 0.0);
        assert_eq!(to_decimal("-0"), 0.0);
        assert_eq!(to_decimal("+abc"), 0.0);
    }

    #[test]
    fn test_parse_decimal_errors() {
        assert_eq!(parse_decimal("  "), Err(OddsFormatError::Empty));
        assert_eq!(
            parse_decimal("7/0"),
            Err(OddsFormatError::ZeroDenominator("7/0".into()))
        );
        assert!(matches!(parse_decimal("abc"), Err(OddsFormatError::NotANumber(_))));
    }
}
