//! Error types for the Argenta conversion pipeline.
//!
//! - [`ConfigError`] - header dictionary and settings errors
//! - [`MergeError`] - path resolution and file reading errors
//! - [`TransformError`] - per-row conversion errors
//! - [`ConvertError`] - top-level errors returned to the CLI
//!
//! Conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building the header dictionary or loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two source columns map to the same canonical field.
    #[error("Columns '{first}' and '{second}' both map to canonical field '{canonical}'")]
    DuplicateCanonical {
        canonical: String,
        first: String,
        second: String,
    },

    /// Header map file could not be read.
    #[error("Cannot read header map '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header map file is not a JSON object of strings.
    #[error("Invalid header map '{}': {source}", .path.display())]
    InvalidHeaderMap {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Merge Errors
// =============================================================================

/// Errors while expanding and reading input files.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Path does not exist or cannot be resolved.
    #[error("Path not found: {}: {source}", .path.display())]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory exists but could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while converting rows.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Header row lacks a column the conversion needs.
    #[error("Missing column for field '{field}'")]
    MissingColumn { field: String },

    /// Amount could not be parsed for the row's currency.
    ///
    /// `row` counts records (header = 1); `line` is the physical line the
    /// record starts on.
    #[error("Line {line}: cannot parse amount '{value}' ({currency}): {reason}")]
    AmountParse {
        row: usize,
        line: u64,
        value: String,
        currency: String,
        reason: String,
    },

    /// Date is present but not in day-month-year form.
    #[error("Line {line}: cannot parse date '{value}': {reason}")]
    DateParse {
        row: usize,
        line: u64,
        value: String,
        reason: String,
    },

    /// Malformed CSV structure (e.g. unterminated quote).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialized output was not valid UTF-8.
    #[error("Output encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl TransformError {
    /// Physical input line the error refers to, if any.
    pub fn line(&self) -> Option<u64> {
        match self {
            TransformError::AmountParse { line, .. } | TransformError::DateParse { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }

    /// Same error, pointing at `line` instead.
    pub fn at_line(mut self, new_line: u64) -> Self {
        if let TransformError::AmountParse { line, .. } | TransformError::DateParse { line, .. } =
            &mut self
        {
            *line = new_line;
        }
        self
    }
}

// =============================================================================
// Top-level Errors
// =============================================================================

/// Top-level conversion errors.
///
/// This is the error type returned by [`crate::convert_files`] and
/// [`crate::convert_reader`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Merge error.
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Transformation error traced back to its input file.
    #[error("Transform error in '{}': {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: TransformError,
    },

    /// Standard input or output failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for top-level conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;
