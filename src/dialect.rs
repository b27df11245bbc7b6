//! Dialect descriptions: delimiter, quoting, escaping, and newline conventions.
//!
//! A [`Dialect`] is immutable once built and cheap to clone/share. Use one of
//! the presets ([`Dialect::rfc4180`], [`Dialect::excel`],
//! [`Dialect::excel_semicolon`], [`Dialect::tsv`], [`Dialect::json_csv`]) or
//! assemble a custom one with [`DialectBuilder`].

use serde::{Deserialize, Serialize};

use crate::error::{CsvError, CsvResult};

/// An immutable description of a delimiter-separated-text dialect.
///
/// Invariants (enforced by [`DialectBuilder::build`] and the
/// copy-with-modification methods):
///
/// - the newline sequence is non-empty
/// - the delimiter is neither CR nor LF
/// - the quote character (if any) is neither CR nor LF
/// - the delimiter and quote character differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialect {
    delimiter: char,
    quote: Option<char>,
    escape: Option<char>,
    newline: String,
    always_quote: bool,
    double_quote: bool,
    allow_unescaped_quotes: bool,
    allow_unbalanced_quotes: bool,
    trim_unquoted: bool,
    skip_whitespace_around_quotes: bool,
}

impl Dialect {
    /// Strict RFC 4180: comma, double quote, `\n`, no escape character.
    ///
    /// Any character after a closing quote (other than delimiter/newline) is a
    /// parse error, and a bare quote inside an unquoted field is rejected.
    pub fn rfc4180() -> Self {
        Self {
            delimiter: ',',
            quote: Some('"'),
            escape: None,
            newline: "\n".to_string(),
            always_quote: false,
            double_quote: true,
            allow_unescaped_quotes: false,
            allow_unbalanced_quotes: false,
            trim_unquoted: false,
            skip_whitespace_around_quotes: false,
        }
    }

    /// Excel-style CSV: comma, double quote, `\r\n`.
    ///
    /// Lenient quoting: whitespace around quoted fields is skipped, and a
    /// quote that does not open a field is treated as a literal character.
    pub fn excel() -> Self {
        Self {
            delimiter: ',',
            quote: Some('"'),
            escape: None,
            newline: "\r\n".to_string(),
            always_quote: false,
            double_quote: true,
            allow_unescaped_quotes: true,
            allow_unbalanced_quotes: false,
            trim_unquoted: false,
            skip_whitespace_around_quotes: true,
        }
    }

    /// Excel-style CSV with `;` as the delimiter (common in locales where `,`
    /// is the decimal separator). Identical to [`Dialect::excel`] otherwise.
    pub fn excel_semicolon() -> Self {
        Self {
            delimiter: ';',
            ..Self::excel()
        }
    }

    /// Tab-separated values: tab delimiter, `\n`, no quoting or escaping at
    /// all. Cells containing tabs or newlines cannot be represented.
    pub fn tsv() -> Self {
        Self {
            delimiter: '\t',
            quote: None,
            escape: None,
            newline: "\n".to_string(),
            always_quote: false,
            double_quote: false,
            allow_unescaped_quotes: false,
            allow_unbalanced_quotes: false,
            trim_unquoted: false,
            skip_whitespace_around_quotes: false,
        }
    }

    /// Lenient "JSON-CSV": comma, double quote, `\n`, backslash escape,
    /// unescaped and unbalanced quotes tolerated.
    pub fn json_csv() -> Self {
        Self {
            delimiter: ',',
            quote: Some('"'),
            escape: Some('\\'),
            newline: "\n".to_string(),
            always_quote: false,
            double_quote: true,
            allow_unescaped_quotes: true,
            allow_unbalanced_quotes: true,
            trim_unquoted: false,
            skip_whitespace_around_quotes: false,
        }
    }

    /// Start building a custom dialect (defaults match [`Dialect::rfc4180`]).
    pub fn builder() -> DialectBuilder {
        DialectBuilder::default()
    }

    /// Field delimiter character.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Quote character, or `None` for quote-less dialects such as TSV.
    pub fn quote(&self) -> Option<char> {
        self.quote
    }

    /// Escape character, or `None` when the dialect has no escape mechanism.
    pub fn escape(&self) -> Option<char> {
        self.escape
    }

    /// Newline sequence written between output records.
    pub fn newline(&self) -> &str {
        &self.newline
    }

    /// Whether every output cell is quoted regardless of content.
    pub fn always_quote(&self) -> bool {
        self.always_quote
    }

    /// Whether a doubled quote inside a quoted field encodes one literal quote.
    pub fn double_quote(&self) -> bool {
        self.double_quote
    }

    /// Whether a quote character may appear literally inside an unquoted field
    /// (and whether text after a closing quote re-opens the field instead of
    /// failing).
    pub fn allow_unescaped_quotes(&self) -> bool {
        self.allow_unescaped_quotes
    }

    /// Whether an unterminated quoted field at end of input is tolerated.
    pub fn allow_unbalanced_quotes(&self) -> bool {
        self.allow_unbalanced_quotes
    }

    /// Whether unquoted fields are trimmed of surrounding whitespace.
    pub fn trim_unquoted(&self) -> bool {
        self.trim_unquoted
    }

    /// Whether spaces/tabs before an opening quote and after a closing quote
    /// are skipped.
    pub fn skip_whitespace_around_quotes(&self) -> bool {
        self.skip_whitespace_around_quotes
    }

    /// Return a copy with a different delimiter.
    pub fn with_delimiter(&self, delimiter: char) -> CsvResult<Self> {
        let mut d = self.clone();
        d.delimiter = delimiter;
        d.validate()?;
        Ok(d)
    }

    /// Return a copy with a different quote character (`None` disables
    /// quoting entirely).
    pub fn with_quote(&self, quote: Option<char>) -> CsvResult<Self> {
        let mut d = self.clone();
        d.quote = quote;
        d.validate()?;
        Ok(d)
    }

    /// Return a copy with a different newline sequence.
    pub fn with_newline(&self, newline: impl Into<String>) -> CsvResult<Self> {
        let mut d = self.clone();
        d.newline = newline.into();
        d.validate()?;
        Ok(d)
    }

    /// Return a copy with always-quote switched on or off.
    pub fn with_always_quote(&self, always_quote: bool) -> CsvResult<Self> {
        let mut d = self.clone();
        d.always_quote = always_quote;
        d.validate()?;
        Ok(d)
    }

    fn validate(&self) -> CsvResult<()> {
        if self.newline.is_empty() {
            return Err(CsvError::config("newline sequence must not be empty"));
        }
        if self.delimiter == '\r' || self.delimiter == '\n' {
            return Err(CsvError::config("delimiter must not be CR or LF"));
        }
        if let Some(q) = self.quote {
            if q == '\r' || q == '\n' {
                return Err(CsvError::config("quote character must not be CR or LF"));
            }
            if q == self.delimiter {
                return Err(CsvError::config(
                    "delimiter and quote character must differ",
                ));
            }
        }
        Ok(())
    }
}

/// Builder for custom [`Dialect`]s.
///
/// Fields default to the RFC 4180 preset; [`DialectBuilder::build`] validates
/// the dialect invariants and fails with [`CsvError::Config`] otherwise.
#[derive(Debug, Clone)]
pub struct DialectBuilder {
    dialect: Dialect,
}

impl Default for DialectBuilder {
    fn default() -> Self {
        Self {
            dialect: Dialect::rfc4180(),
        }
    }
}

impl DialectBuilder {
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.dialect.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: Option<char>) -> Self {
        self.dialect.quote = quote;
        self
    }

    pub fn escape(mut self, escape: Option<char>) -> Self {
        self.dialect.escape = escape;
        self
    }

    pub fn newline(mut self, newline: impl Into<String>) -> Self {
        self.dialect.newline = newline.into();
        self
    }

    pub fn always_quote(mut self, always_quote: bool) -> Self {
        self.dialect.always_quote = always_quote;
        self
    }

    pub fn double_quote(mut self, double_quote: bool) -> Self {
        self.dialect.double_quote = double_quote;
        self
    }

    pub fn allow_unescaped_quotes(mut self, allow: bool) -> Self {
        self.dialect.allow_unescaped_quotes = allow;
        self
    }

    pub fn allow_unbalanced_quotes(mut self, allow: bool) -> Self {
        self.dialect.allow_unbalanced_quotes = allow;
        self
    }

    pub fn trim_unquoted(mut self, trim: bool) -> Self {
        self.dialect.trim_unquoted = trim;
        self
    }

    pub fn skip_whitespace_around_quotes(mut self, skip: bool) -> Self {
        self.dialect.skip_whitespace_around_quotes = skip;
        self
    }

    /// Validate and freeze the dialect.
    pub fn build(self) -> CsvResult<Dialect> {
        self.dialect.validate()?;
        Ok(self.dialect)
    }
}
