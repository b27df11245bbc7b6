//! The finite-state-machine tokenizer.
//!
//! [`CsvParser`] turns a character stream into logical records (ordered lists
//! of raw field strings) under the rules of a [`Dialect`]. One call to
//! [`CsvParser::read_row`] produces one record, or `None` once the stream is
//! exhausted with no partial record pending.
//!
//! CR, LF, and CRLF are each treated as a single logical record terminator
//! outside quoted fields; inside a quoted field they are ordinary content.

use std::io;

use crate::dialect::Dialect;
use crate::error::{CsvError, CsvResult};

use super::chars::{CharSource, StrChars, Utf8CharReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartCell,
    InsideQuoted,
    InsideUnquoted,
    AfterQuote,
}

/// Dialect-driven tokenizer over a fallible character stream.
///
/// Holds mutable positional state (FSM state between characters, the current
/// line number); not shareable across threads without external
/// synchronization.
pub struct CsvParser<I> {
    source: CharSource<I>,
    dialect: Dialect,
    // 1-based line number where the next record starts.
    line: u64,
}

impl CsvParser<StrChars> {
    /// Tokenize in-memory text.
    pub fn from_str(text: &str, dialect: Dialect) -> Self {
        Self::new(StrChars::new(text), dialect)
    }
}

impl<R: io::Read> CsvParser<Utf8CharReader<R>> {
    /// Tokenize a UTF-8 byte stream, buffered with `buffer_size`.
    pub fn from_reader(reader: R, dialect: Dialect, buffer_size: usize) -> Self {
        Self::new(Utf8CharReader::new(reader, buffer_size), dialect)
    }
}

impl<I> CsvParser<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    /// Tokenize an arbitrary character source.
    pub fn new(source: I, dialect: Dialect) -> Self {
        Self {
            source: CharSource::new(source),
            dialect,
            line: 1,
        }
    }

    /// The dialect in force.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// 1-based line number at which the next record will start.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Read one logical record.
    ///
    /// Returns `Ok(None)` at end of stream (never an empty record). A final
    /// record without a trailing newline is returned in full. A blank physical
    /// line yields a one-element record containing a single empty string.
    pub fn read_row(&mut self) -> CsvResult<Option<Vec<String>>> {
        let quote = self.dialect.quote();
        let escape = self.dialect.escape();
        let delimiter = self.dialect.delimiter();
        let skip_ws = self.dialect.skip_whitespace_around_quotes();

        let mut fields: Vec<String> = Vec::new();
        let mut buf = String::new();
        let mut state = State::StartCell;
        let mut consumed_any = false;

        loop {
            let c = match self.source.next()? {
                Some(c) => c,
                None => return self.finish_at_eof(state, consumed_any, fields, buf),
            };
            consumed_any = true;

            match state {
                State::StartCell => {
                    if c == delimiter {
                        fields.push(self.finish_unquoted(&mut buf));
                    } else if quote == Some(c) {
                        // Any buffered leading whitespace before the quote is
                        // discarded under the ws-skip policy.
                        buf.clear();
                        state = State::InsideQuoted;
                    } else if self.eat_newline(c)? {
                        fields.push(self.finish_unquoted(&mut buf));
                        return Ok(Some(fields));
                    } else if skip_ws && (c == ' ' || c == '\t') {
                        buf.push(c);
                    } else {
                        buf.push(c);
                        state = State::InsideUnquoted;
                    }
                }
                State::InsideUnquoted => {
                    if escape == Some(c) {
                        if let Some(next) = self.source.next()? {
                            buf.push(next);
                        }
                    } else if c == delimiter {
                        fields.push(self.finish_unquoted(&mut buf));
                        state = State::StartCell;
                    } else if quote == Some(c) {
                        if self.dialect.allow_unescaped_quotes() {
                            buf.push(c);
                        } else {
                            return Err(CsvError::parse(
                                self.line,
                                "unexpected quote in unquoted field",
                            ));
                        }
                    } else if self.eat_newline(c)? {
                        fields.push(self.finish_unquoted(&mut buf));
                        return Ok(Some(fields));
                    } else {
                        buf.push(c);
                    }
                }
                State::InsideQuoted => {
                    if escape == Some(c) {
                        if let Some(next) = self.source.next()? {
                            buf.push(next);
                        }
                    } else if quote == Some(c) {
                        match self.source.peek()? {
                            Some(next) if quote == Some(next) && self.dialect.double_quote() => {
                                self.source.next()?;
                                buf.push(c);
                            }
                            _ => state = State::AfterQuote,
                        }
                    } else if c == '\r' {
                        // Quoted content keeps newlines verbatim, but they
                        // still advance the line counter (CRLF counts once).
                        buf.push('\r');
                        if self.source.peek()? == Some('\n') {
                            self.source.next()?;
                            buf.push('\n');
                        }
                        self.line += 1;
                    } else if c == '\n' {
                        buf.push('\n');
                        self.line += 1;
                    } else {
                        buf.push(c);
                    }
                }
                State::AfterQuote => {
                    if c == delimiter {
                        fields.push(std::mem::take(&mut buf));
                        state = State::StartCell;
                    } else if self.eat_newline(c)? {
                        fields.push(std::mem::take(&mut buf));
                        return Ok(Some(fields));
                    } else if skip_ws && (c == ' ' || c == '\t') {
                        // Trailing whitespace after a closing quote is ignored.
                    } else if self.dialect.allow_unescaped_quotes() {
                        // Lenient dialects reinterpret the whole cell as
                        // unquoted; quote characters lose special meaning.
                        buf.push(c);
                        state = State::InsideUnquoted;
                    } else {
                        return Err(CsvError::parse(
                            self.line,
                            format!("unexpected character '{c}' after closing quote"),
                        ));
                    }
                }
            }
        }
    }

    /// Read all remaining records.
    pub fn read_all(&mut self) -> CsvResult<Vec<Vec<String>>> {
        let mut rows = Vec::new();
        while let Some(row) = self.read_row()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// If `c` starts a logical newline (CR, LF, or CRLF), consume the rest of
    /// it, bump the line counter, and return true.
    fn eat_newline(&mut self, c: char) -> CsvResult<bool> {
        match c {
            '\n' => {
                self.line += 1;
                Ok(true)
            }
            '\r' => {
                if self.source.peek()? == Some('\n') {
                    self.source.next()?;
                }
                self.line += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn finish_unquoted(&self, buf: &mut String) -> String {
        let value = std::mem::take(buf);
        if self.dialect.trim_unquoted() {
            value.trim().to_string()
        } else {
            value
        }
    }

    fn finish_at_eof(
        &mut self,
        state: State,
        consumed_any: bool,
        mut fields: Vec<String>,
        mut buf: String,
    ) -> CsvResult<Option<Vec<String>>> {
        match state {
            State::StartCell => {
                if !consumed_any && fields.is_empty() {
                    return Ok(None);
                }
                // A trailing delimiter (or buffered whitespace) still owes one
                // final field.
                fields.push(self.finish_unquoted(&mut buf));
                Ok(Some(fields))
            }
            State::InsideUnquoted => {
                fields.push(self.finish_unquoted(&mut buf));
                Ok(Some(fields))
            }
            State::AfterQuote => {
                fields.push(buf);
                Ok(Some(fields))
            }
            State::InsideQuoted => {
                if self.dialect.allow_unbalanced_quotes() {
                    fields.push(buf);
                    Ok(Some(fields))
                } else {
                    Err(CsvError::parse(
                        self.line,
                        "unterminated quoted field at end of input",
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn rows(text: &str, dialect: Dialect) -> Vec<Vec<String>> {
        CsvParser::from_str(text, dialect).read_all().unwrap()
    }

    #[test]
    fn empty_input_is_end_of_stream() {
        let mut p = CsvParser::from_str("", Dialect::rfc4180());
        assert!(p.read_row().unwrap().is_none());
        assert!(p.read_row().unwrap().is_none());
    }

    #[test]
    fn blank_line_is_a_single_empty_field() {
        assert_eq!(rows("\n", Dialect::rfc4180()), vec![vec!["".to_string()]]);
    }

    #[test]
    fn doubled_quotes_collapse() {
        let got = rows("\"a\"\"b\"\n", Dialect::rfc4180());
        assert_eq!(got, vec![vec!["a\"b".to_string()]]);
    }

    #[test]
    fn strict_dialect_rejects_garbage_after_closing_quote() {
        let err = CsvParser::from_str("\"a\"x,b\n", Dialect::rfc4180())
            .read_row()
            .unwrap_err();
        assert!(err.to_string().contains("after closing quote"));
    }

    #[test]
    fn lenient_dialect_reinterprets_after_quote_content() {
        let got = rows("\"a\"x,b\r\n", Dialect::excel());
        assert_eq!(got, vec![vec!["ax".to_string(), "b".to_string()]]);
    }

    #[test]
    fn json_csv_escape_and_unbalanced_quote() {
        let got = rows("a\\,b,c\n", Dialect::json_csv());
        assert_eq!(got, vec![vec!["a,b".to_string(), "c".to_string()]]);

        let got = rows("\"never closed", Dialect::json_csv());
        assert_eq!(got, vec![vec!["never closed".to_string()]]);
    }
}
