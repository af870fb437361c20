//! Date reformatting: `DD-MM-YYYY` to `MM/DD/YYYY`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Format of dates in Argenta exports.
pub const SOURCE_FORMAT: &str = "%d-%m-%Y";
/// Format of dates in normalized output.
pub const TARGET_FORMAT: &str = "%m/%d/%Y";

// chrono accepts unpadded fields; exports always pad.
static SOURCE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").expect("static regex is valid"));

/// Reformat a source date. Blank input yields an empty string.
pub fn normalize_date(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !SOURCE_SHAPE.is_match(trimmed) {
        return Err(format!("expected DD-MM-YYYY, got '{}'", trimmed));
    }

    NaiveDate::parse_from_str(trimmed, SOURCE_FORMAT)
        .map(|date| date.format(TARGET_FORMAT).to_string())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reformat() {
        assert_eq!(normalize_date("01-03-2021").unwrap(), "03/01/2021");
        assert_eq!(normalize_date("31-12-1999").unwrap(), "12/31/1999");
    }

    #[test]
    fn test_blank_is_empty() {
        assert_eq!(normalize_date("").unwrap(), "");
        assert_eq!(normalize_date("   ").unwrap(), "");
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(normalize_date(" 05-06-2022 ").unwrap(), "06/05/2022");
    }

    #[test]
    fn test_malformed_dates() {
        assert!(normalize_date("2021-03-01").is_err());
        assert!(normalize_date("31-02-2021").is_err());
        assert!(normalize_date("01/03/2021").is_err());
        assert!(normalize_date("yesterday").is_err());
    }

    #[test]
    fn test_unpadded_dates_rejected() {
        assert!(normalize_date("1-3-2021").is_err());
        assert!(normalize_date("01-3-2021").is_err());
        assert!(normalize_date("01-03-21").is_err());
        assert!(normalize_date("01-03-02021").is_err());
    }

    #[test]
    fn test_reformat_is_invertible() {
        let mut day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        while day < end {
            let source = day.format(SOURCE_FORMAT).to_string();
            let target = normalize_date(&source).unwrap();
            let back = NaiveDate::parse_from_str(&target, TARGET_FORMAT).unwrap();
            assert_eq!(back.format(SOURCE_FORMAT).to_string(), source);
            day = day.succ_opt().unwrap();
        }
    }
}
