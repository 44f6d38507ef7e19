// ABOUTME: Locale-aware price parsing that turns raw storefront price text into a canonical f64.
// ABOUTME: Disambiguates "1.234,56" versus "1,234.56" style separators and strips currency markers.

//! Locale price parsing.
//!
//! Storefronts render prices in several numeric conventions. The parser
//! normalises them to a dot-decimal string and reads the first numeric run:
//!
//! - both `.` and `,` present: the one appearing last is the decimal separator;
//! - a single `,` followed by at most two characters: decimal comma (`269,99`);
//! - any other comma usage: thousands separators (`1,234,567`);
//! - dots only: already canonical.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;

/// Currency markers and spacing removed before separator analysis.
const STRIP_PATTERNS: &[&str] = &["$", "€", "£", "USD", "MXN", " ", "\u{00a0}"];

static STRIPPER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(STRIP_PATTERNS).expect("static strip patterns are valid"));

static NUMERIC_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d.]+").expect("static numeric regex is valid"));

/// Why a price string could not be turned into a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("no numeric value found in: {0}")]
    NoNumericValue(String),
    #[error("invalid number {0:?}")]
    Invalid(String),
    #[error("price is not positive: {0}")]
    NotPositive(String),
}

/// Parse a raw price string into a canonical floating-point value.
///
/// The result is always `>= 0` when parsing succeeds.
pub fn parse_price(raw: &str) -> Result<f64, PriceError> {
    let stripped = STRIPPER.replace_all(raw.trim(), &[""; STRIP_PATTERNS.len()]);
    let normalized = normalize_separators(&stripped);

    let run = NUMERIC_RUN_RE
        .find(&normalized)
        .map(|m| m.as_str())
        .ok_or_else(|| PriceError::NoNumericValue(normalized.clone()))?;

    run.parse::<f64>()
        .map_err(|_| PriceError::Invalid(run.to_string()))
}

/// Parse a price and reject values that are not strictly positive.
///
/// Every extraction path uses this: a zero price means "unknown".
pub fn parse_positive_price(raw: &str) -> Result<f64, PriceError> {
    let value = parse_price(raw)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(PriceError::NotPositive(raw.trim().to_string()))
    }
}

/// Rewrite thousands/decimal separators so the string uses a single `.` decimal point.
fn normalize_separators(s: &str) -> String {
    let dots = s.matches('.').count();
    let commas = s.matches(',').count();

    if dots > 0 && commas > 0 {
        let last_dot = s.rfind('.');
        let last_comma = s.rfind(',');
        if last_comma > last_dot {
            // 1.234,56
            s.replace('.', "").replacen(',', ".", 1)
        } else {
            // 1,234.56
            s.replace(',', "")
        }
    } else if commas == 1 {
        match s.split_once(',') {
            Some((_, decimals)) if decimals.len() <= 2 => s.replacen(',', ".", 1),
            _ => s.replace(',', ""),
        }
    } else if commas > 1 {
        s.replace(',', "")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn us_thousands_with_decimal() {
        assert!(approx(parse_price("1,234.56").unwrap(), 1234.56));
    }

    #[test]
    fn european_thousands_with_decimal_comma() {
        assert!(approx(parse_price("1.234,56").unwrap(), 1234.56));
    }

    #[test]
    fn single_decimal_comma() {
        assert!(approx(parse_price("269,99").unwrap(), 269.99));
        assert!(approx(parse_price("5,5").unwrap(), 5.5));
    }

    #[test]
    fn comma_with_three_trailing_digits_is_thousands() {
        assert!(approx(parse_price("1,234").unwrap(), 1234.0));
    }

    #[test]
    fn multiple_commas_are_thousands() {
        assert!(approx(parse_price("1,234,567").unwrap(), 1_234_567.0));
    }

    #[test]
    fn strips_currency_symbols_and_codes() {
        assert!(approx(parse_price("$1,234.00 MXN").unwrap(), 1234.0));
        assert!(approx(parse_price("USD 19.99").unwrap(), 19.99));
        assert!(approx(parse_price("€ 12,50").unwrap(), 12.5));
        assert!(approx(parse_price("£7").unwrap(), 7.0));
    }

    #[test]
    fn strips_non_breaking_space() {
        assert!(approx(parse_price("1\u{00a0}299,00\u{00a0}€").unwrap(), 1299.0));
    }

    #[test]
    fn dots_only_left_unchanged() {
        assert!(approx(parse_price("49.50").unwrap(), 49.5));
    }

    #[test]
    fn takes_first_numeric_run() {
        assert!(approx(parse_price("Precio: 309.48 envío gratis").unwrap(), 309.48));
    }

    #[test]
    fn rejects_text_without_digits() {
        assert!(matches!(
            parse_price("abc"),
            Err(PriceError::NoNumericValue(_))
        ));
        assert!(parse_price("").is_err());
    }

    #[test]
    fn lone_dot_is_invalid_number() {
        assert!(matches!(parse_price("."), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn zero_is_parsed_but_not_positive() {
        assert!(approx(parse_price("0.00").unwrap(), 0.0));
        assert!(matches!(
            parse_positive_price("0.00"),
            Err(PriceError::NotPositive(_))
        ));
        assert!(approx(parse_positive_price("$10").unwrap(), 10.0));
    }
}
