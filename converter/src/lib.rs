//! # Argenta - bank statement export normalization
//!
//! Converts Argenta CSV exports (`;` separated, `1.234,56` amounts,
//! `DD-MM-YYYY` dates) into `,` separated CSV with `1234.56` amounts and
//! `MM/DD/YYYY` dates. Several exports can be merged into one output.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Files/dirs  │────▶│   Merger    │────▶│ Transformer │────▶│ Normalized  │
//! │  or stdin   │     │ (dedup hdr) │     │ (rows)      │     │    CSV      │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Header dictionary, dialects, environment settings
//! - [`input`] - Byte decoding with encoding detection
//! - [`merge`] - Multi-file merging
//! - [`transform`] - Amount/date normalization and the row transformer
//! - [`logs`] - Diagnostic output on stderr

use std::io::Read;
use std::path::Path;

pub mod config;
pub mod error;
pub mod input;
pub mod logs;
pub mod merge;
pub mod transform;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{DialectConfig, HeaderMap, HeaderOverrides, Settings};
pub use error::{
    ConfigError, ConvertError, ConvertResult, MergeError, TransformError,
};
pub use merge::{expand_paths, merge_files, read_files, MergedInput};
pub use transform::{normalize_amount, normalize_date, ColumnIndex, Currency, Transformer};

/// Merge `paths` and convert the combined input.
///
/// Row errors are reported against the file and line they came from.
pub fn convert_files<P: AsRef<Path>>(
    paths: &[P],
    include_header: bool,
    transformer: &Transformer,
) -> ConvertResult<String> {
    let merged = merge_files(paths, include_header)?;
    logs::log_success(format!("Merged {} lines", merged.lines.len()));

    transformer.parse_lines(&merged.lines).map_err(|err| {
        match err.line().and_then(|line| merged.locate(line)) {
            Some((path, line)) => ConvertError::InFile {
                path: path.to_path_buf(),
                source: err.at_line(line),
            },
            None => err.into(),
        }
    })
}

/// Convert everything readable from `reader` (typically stdin).
pub fn convert_reader<R: Read>(reader: R, transformer: &Transformer) -> ConvertResult<String> {
    let lines = input::read_lines(reader)?;
    Ok(transformer.parse_lines(&lines)?)
}
