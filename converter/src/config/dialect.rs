//! CSV dialects for reading exports and writing normalized output.

/// Parsing/serialization options for one side of the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectConfig {
    /// Field separator byte
    pub delimiter: u8,
    /// First non-blank record is a header row
    pub has_headers: bool,
    /// Drop literal blank lines
    pub skip_blanks: bool,
    /// Quote every output field, not only those that need it
    pub force_quotes: bool,
}

impl DialectConfig {
    /// Argenta export dialect: `;` separated.
    pub fn input() -> Self {
        Self {
            delimiter: b';',
            ..Self::shared()
        }
    }

    /// Normalized output dialect: `,` separated.
    pub fn output() -> Self {
        Self {
            delimiter: b',',
            ..Self::shared()
        }
    }

    fn shared() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            skip_blanks: true,
            force_quotes: true,
        }
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_force_quotes(mut self, force_quotes: bool) -> Self {
        self.force_quotes = force_quotes;
        self
    }

    pub(crate) fn reader(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true);
        builder
    }

    pub(crate) fn writer(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(if self.force_quotes {
                csv::QuoteStyle::Always
            } else {
                csv::QuoteStyle::Necessary
            });
        builder
    }
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self::input()
    }
}
