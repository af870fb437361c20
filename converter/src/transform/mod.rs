//! Transformation module.
//!
//! This module handles Argenta row conversion:
//! - Amount: currency-aware amount normalization
//! - Date: day-month-year to month/day/year
//! - Pipeline: the row transformer

pub mod amount;
pub mod date;
pub mod pipeline;

pub use amount::{normalize_amount, Currency};
pub use date::normalize_date;
pub use pipeline::{ColumnIndex, Transformer};
