//! Currency-aware amount normalization.
//!
//! Each currency fixes which of `.` and `,` is the decimal mark. The
//! amount is parsed under those rules and rendered with `.` as decimal
//! mark, no grouping, and the currency's minor-unit precision.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formatting conventions of one currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub decimal_mark: char,
    pub thousands_separator: char,
    /// Digits after the decimal mark
    pub minor_units: u32,
}

const fn currency(code: &'static str, decimal_mark: char, thousands_separator: char, minor_units: u32) -> Currency {
    Currency { code, decimal_mark, thousands_separator, minor_units }
}

static CURRENCIES: [Currency; 14] = [
    currency("EUR", ',', '.', 2),
    currency("USD", '.', ',', 2),
    currency("GBP", '.', ',', 2),
    currency("CHF", '.', ',', 2),
    currency("JPY", '.', ',', 0),
    currency("SEK", ',', ' ', 2),
    currency("NOK", ',', '.', 2),
    currency("DKK", ',', '.', 2),
    currency("PLN", ',', ' ', 2),
    currency("CZK", ',', ' ', 2),
    currency("HUF", ',', ' ', 2),
    currency("CAD", '.', ',', 2),
    currency("AUD", '.', ',', 2),
    currency("NZD", '.', ',', 2),
];

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("static regex is valid"));

static LEADING_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,3}$").expect("static regex is valid"));

static FULL_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3}$").expect("static regex is valid"));

impl Currency {
    /// Look up a currency by ISO code (case-insensitive).
    pub fn find(code: &str) -> Option<&'static Currency> {
        let code = code.trim();
        CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Parse an amount written under this currency's conventions.
    pub fn parse(&self, raw: &str) -> Result<Decimal, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("empty amount".to_string());
        }

        let (negative, body) = match trimmed.as_bytes()[0] {
            b'-' => (true, trimmed[1..].trim_start()),
            b'+' => (false, trimmed[1..].trim_start()),
            _ => (false, trimmed),
        };

        let (integer, fraction) = match body.split_once(self.decimal_mark) {
            Some((int, frac)) => (int, Some(frac)),
            None => (body, None),
        };

        let mut digits = String::with_capacity(body.len());
        let groups: Vec<&str> = integer
            .split(|c: char| c == self.thousands_separator || c == ' ')
            .collect();
        // Grouped integers must read 1-3 digits, then blocks of exactly 3.
        let well_formed = match groups.as_slice() {
            [single] => DIGITS.is_match(single),
            [first, rest @ ..] => {
                LEADING_GROUP.is_match(first) && rest.iter().all(|g| FULL_GROUP.is_match(g))
            }
            [] => false,
        };
        if !well_formed {
            return Err(format!("'{}' is not a number for {}", raw.trim(), self.code));
        }
        groups.iter().for_each(|g| digits.push_str(g));

        if let Some(fraction) = fraction {
            if !DIGITS.is_match(fraction) {
                return Err(format!("'{}' has an invalid fraction for {}", raw.trim(), self.code));
            }
            digits.push('.');
            digits.push_str(fraction);
        }

        let value = Decimal::from_str(&digits).map_err(|e| e.to_string())?;
        Ok(if negative { -value } else { value })
    }

    /// Render a value with `.` as decimal mark and this currency's precision.
    pub fn format(&self, value: Decimal) -> String {
        let rounded = value.round_dp_with_strategy(self.minor_units, RoundingStrategy::MidpointNearestEven);
        let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
        format!("{:.*}", self.minor_units as usize, rounded)
    }
}

/// Normalize `raw` for `currency_code`, e.g. `("1.234,56", "EUR")` → `"1234.56"`.
pub fn normalize_amount(raw: &str, currency_code: &str) -> Result<String, String> {
    let currency = Currency::find(currency_code)
        .ok_or_else(|| format!("unknown currency '{}'", currency_code.trim()))?;
    let value = currency.parse(raw)?;
    Ok(currency.format(value))
}
