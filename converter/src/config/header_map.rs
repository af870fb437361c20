//! Source column names to canonical field names.
//!
//! The default dictionary covers the ten columns of an Argenta export, in
//! the order the bank writes them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Canonical field for the transaction amount.
pub const AMOUNT: &str = "amount";
/// Canonical field for the ISO currency code.
pub const CURRENCY: &str = "currency";
/// Canonical field for the value date.
pub const VALUE_DATE: &str = "value_date";
/// Canonical field for the booking date.
pub const DATE: &str = "date";

const DEFAULT_COLUMNS: [(&str, &str); 10] = [
    ("Valutadatum", VALUE_DATE),
    ("Ref. v/d verrichting", "reference"),
    ("Beschrijving", "transaction_type"),
    ("Bedrag v/d verrichting", AMOUNT),
    ("Munt", CURRENCY),
    ("Datum v. verrichting", DATE),
    ("Rekening tegenpartij", "beneficiary_account"),
    ("Naam v/d tegenpartij", "beneficiary_name"),
    ("Mededeling 1", "memo_1"),
    ("Mededeling 2", "memo_2"),
];

/// Overrides read from a JSON object: `{"Source name": "canonical"}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct HeaderOverrides(pub BTreeMap<String, String>);

impl HeaderOverrides {
    /// Load overrides from a JSON file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::InvalidHeaderMap {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Invertible mapping between localized column names and canonical fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    /// (source, canonical) in column order
    columns: Vec<(String, String)>,
}

impl HeaderMap {
    /// Merge `overrides` over the default dictionary.
    ///
    /// An override for an existing source name replaces its canonical name
    /// in place; new source names are appended.
    pub fn with_overrides<I, S, C>(overrides: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: Into<String>,
    {
        let mut columns: Vec<(String, String)> = DEFAULT_COLUMNS
            .iter()
            .map(|(s, c)| (s.to_string(), c.to_string()))
            .collect();

        for (source, canonical) in overrides {
            let source = source.into();
            let canonical = canonical.into();
            match columns.iter_mut().find(|(s, _)| *s == source) {
                Some(entry) => entry.1 = canonical,
                None => columns.push((source, canonical)),
            }
        }

        Self::from_columns(columns)
    }

    /// Build a map from explicit (source, canonical) pairs.
    pub fn from_columns(columns: Vec<(String, String)>) -> ConfigResult<Self> {
        for (i, (source, canonical)) in columns.iter().enumerate() {
            if let Some((first, _)) = columns[..i].iter().find(|(_, c)| c == canonical) {
                return Err(ConfigError::DuplicateCanonical {
                    canonical: canonical.clone(),
                    first: first.clone(),
                    second: source.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Source column name for a canonical field.
    pub fn source_for(&self, canonical: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, c)| c == canonical)
            .map(|(s, _)| s.as_str())
    }

    /// Canonical field for a source column name.
    pub fn canonical_for(&self, source: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, c)| c.as_str())
    }

    /// Declared position of a canonical field.
    pub fn position_of(&self, canonical: &str) -> Option<usize> {
        self.columns.iter().position(|(_, c)| c == canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(s, c)| (s.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for HeaderMap {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS
                .iter()
                .map(|(s, c)| (s.to_string(), c.to_string()))
                .collect(),
        }
    }
}
