//! Row transformation pipeline.
//!
//! Reads Argenta CSV text in the input dialect, rewrites the amount and
//! date columns of every data row, and writes the rows back out in the
//! output dialect with column order and count unchanged.
//!
//! # Example
//!
//! ```rust
//! use argenta::Transformer;
//!
//! let input = "Valutadatum;Bedrag v/d verrichting;Munt;Datum v. verrichting\n\
//!              01-03-2021;1.234,56;EUR;02-03-2021\n";
//! let output = Transformer::default().parse(input).unwrap();
//!
//! assert_eq!(
//!     output,
//!     "\"Valutadatum\",\"Bedrag v/d verrichting\",\"Munt\",\"Datum v. verrichting\"\n\
//!      \"03/01/2021\",\"1234.56\",\"EUR\",\"03/02/2021\"\n"
//! );
//! ```

use std::borrow::Cow;

use csv::StringRecord;

use super::amount::normalize_amount;
use super::date::normalize_date;
use crate::config::header_map::{AMOUNT, CURRENCY, DATE, VALUE_DATE};
use crate::config::{DialectConfig, HeaderMap};
use crate::error::{TransformError, TransformResult};
use crate::logs::log_debug;

/// Positions of the columns the transformer reads or rewrites.
///
/// Resolved once per parse, from the header row or from the header
/// map's declared order when the input has no header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub amount: usize,
    pub currency: usize,
    pub value_date: usize,
    pub date: usize,
}

impl ColumnIndex {
    /// Locate the columns in an actual header row.
    pub fn from_header(header: &StringRecord, map: &HeaderMap) -> TransformResult<Self> {
        Self::resolve(map, |source| header.iter().position(|h| h.trim() == source))
    }

    /// Use the map's declaration order as the column layout.
    pub fn from_declared(map: &HeaderMap) -> TransformResult<Self> {
        Self::resolve(map, |source| map.canonical_for(source).and_then(|c| map.position_of(c)))
    }

    fn resolve<F>(map: &HeaderMap, locate: F) -> TransformResult<Self>
    where
        F: Fn(&str) -> Option<usize>,
    {
        let column = |field: &str| {
            map.source_for(field)
                .and_then(&locate)
                .ok_or_else(|| TransformError::MissingColumn { field: field.to_string() })
        };

        Ok(Self {
            amount: column(AMOUNT)?,
            currency: column(CURRENCY)?,
            value_date: column(VALUE_DATE)?,
            date: column(DATE)?,
        })
    }
}

/// Converts Argenta CSV text into normalized CSV text.
#[derive(Debug, Clone)]
pub struct Transformer {
    header_map: HeaderMap,
    input: DialectConfig,
    output: DialectConfig,
}

impl Transformer {
    pub fn new(header_map: HeaderMap) -> Self {
        Self::with_dialects(header_map, DialectConfig::input(), DialectConfig::output())
    }

    pub fn with_dialects(header_map: HeaderMap, input: DialectConfig, output: DialectConfig) -> Self {
        Self { header_map, input, output }
    }

    /// Join `lines` with `\n` and parse the result.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> TransformResult<String> {
        let raw = lines.iter().map(|l| l.as_ref()).collect::<Vec<&str>>().join("\n");
        self.parse(&raw)
    }

    /// Convert raw input text. Any failing row aborts the whole conversion.
    pub fn parse(&self, raw: &str) -> TransformResult<String> {
        let prepared = if self.input.skip_blanks {
            Cow::Borrowed(raw)
        } else {
            Cow::Owned(mark_blank_lines(raw))
        };

        let mut reader = self.input.reader().from_reader(prepared.as_bytes());
        let mut writer = self.output.writer().from_writer(vec![]);

        let mut columns = if self.input.has_headers {
            None
        } else {
            Some(ColumnIndex::from_declared(&self.header_map)?)
        };

        let mut lines = LineCounter::new(prepared.as_bytes());
        let mut record = StringRecord::new();
        let mut row = 0;
        while reader.read_record(&mut record)? {
            row += 1;
            let line = lines.advance_to(reader.position().byte());
            match columns {
                None => {
                    columns = Some(ColumnIndex::from_header(&record, &self.header_map)?);
                    writer.write_record(&record)?;
                }
                Some(cols) => {
                    let converted = convert_row(&cols, &record, Location { row, line })?;
                    writer.write_record(&converted)?;
                }
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        log_debug(format!("Converted {} records", row));
        Ok(String::from_utf8(bytes)?)
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(HeaderMap::default())
    }
}

#[derive(Debug, Clone, Copy)]
struct Location {
    row: usize,
    line: u64,
}

fn convert_row(cols: &ColumnIndex, record: &StringRecord, at: Location) -> TransformResult<Vec<String>> {
    let mut fields: Vec<String> = record.iter().map(str::to_string).collect();

    let raw_amount = record.get(cols.amount).unwrap_or("");
    let currency = record.get(cols.currency).unwrap_or("");
    let amount = normalize_amount(raw_amount, currency).map_err(|reason| TransformError::AmountParse {
        row: at.row,
        line: at.line,
        value: raw_amount.to_string(),
        currency: currency.trim().to_string(),
        reason,
    })?;
    if let Some(slot) = fields.get_mut(cols.amount) {
        *slot = amount;
    }

    for idx in [cols.value_date, cols.date] {
        // Absent trailing columns stay absent.
        let Some(raw) = record.get(idx) else { continue };
        let date = normalize_date(raw).map_err(|reason| TransformError::DateParse {
            row: at.row,
            line: at.line,
            value: raw.to_string(),
            reason,
        })?;
        fields[idx] = date;
    }

    Ok(fields)
}

/// Maps reader byte offsets to 1-based line numbers.
///
/// `csv::Position` is stamped before skipped blank lines and a CRLF's
/// trailing `\n` are consumed, so it can point one or more lines early.
struct LineCounter<'a> {
    text: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self { text, offset: 0, line: 1 }
    }

    /// Consume up to `end` and return the line the record in that span starts on.
    fn advance_to(&mut self, end: u64) -> u64 {
        let end = usize::try_from(end).unwrap_or(usize::MAX).min(self.text.len());
        let span = &self.text[self.offset.min(end)..end];
        let lead = span.iter().take_while(|&&b| b == b'\r' || b == b'\n').count();
        let newlines = |bytes: &[u8]| bytes.iter().filter(|&&b| b == b'\n').count() as u64;

        let start = self.line + newlines(&span[..lead]);
        self.line = start + newlines(&span[lead..]);
        self.offset = end;
        start
    }
}

/// Turn literal blank lines into single empty-field records so the CSV
/// reader keeps them. Blank lines inside a quoted field are left alone.
fn mark_blank_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_quotes = false;
    for line in raw.split_inclusive('\n') {
        let content = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        if !in_quotes && content.is_empty() {
            out.push_str("\"\"");
        } else if content.matches('"').count() % 2 == 1 {
            in_quotes = !in_quotes;
        }
        out.push_str(line);
    }
    out
}
