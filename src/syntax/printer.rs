//! The dialect-aware serializer.
//!
//! [`CsvPrinter`] is the exact inverse of [`crate::syntax::CsvParser`]: for a
//! given dialect, tokenizing a printed row reproduces the original cells.

use std::io::Write;

use crate::dialect::Dialect;
use crate::error::{CsvError, CsvResult};

/// Writes rows of raw cells as dialect-correct, escaped text.
pub struct CsvPrinter<W: Write> {
    sink: W,
    dialect: Dialect,
}

impl<W: Write> CsvPrinter<W> {
    pub fn new(sink: W, dialect: Dialect) -> Self {
        Self { sink, dialect }
    }

    /// The dialect in force.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Write one row: cells separated by the dialect delimiter, terminated by
    /// the dialect newline.
    ///
    /// A cell is quoted iff the dialect always quotes, or the cell contains
    /// the delimiter, CR, LF, the quote character, or leading/trailing space.
    /// Quoting doubles every internal quote character. For quote-less
    /// dialects (TSV), a cell containing the delimiter or a newline cannot be
    /// represented and fails with [`CsvError::Config`].
    pub fn write_row<S: AsRef<str>>(&mut self, cells: &[S]) -> CsvResult<()> {
        for (idx, cell) in cells.iter().enumerate() {
            if idx > 0 {
                write_char(&mut self.sink, self.dialect.delimiter())?;
            }
            self.write_cell(cell.as_ref())?;
        }
        self.sink.write_all(self.dialect.newline().as_bytes())?;
        Ok(())
    }

    /// Write raw bytes straight through (BOM emission).
    pub(crate) fn write_raw(&mut self, bytes: &[u8]) -> CsvResult<()> {
        self.sink.write_all(bytes)?;
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> CsvResult<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(mut self) -> CsvResult<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn write_cell(&mut self, cell: &str) -> CsvResult<()> {
        let quote = match self.dialect.quote() {
            Some(q) => q,
            None => {
                if cell.contains(self.dialect.delimiter())
                    || cell.contains('\r')
                    || cell.contains('\n')
                {
                    return Err(CsvError::config(format!(
                        "cell {cell:?} cannot be represented without quoting in this dialect"
                    )));
                }
                self.sink.write_all(cell.as_bytes())?;
                return Ok(());
            }
        };

        if !self.needs_quoting(cell, quote) {
            self.sink.write_all(cell.as_bytes())?;
            return Ok(());
        }

        write_char(&mut self.sink, quote)?;
        for c in cell.chars() {
            if c == quote {
                write_char(&mut self.sink, quote)?;
            }
            write_char(&mut self.sink, c)?;
        }
        write_char(&mut self.sink, quote)?;
        Ok(())
    }

    fn needs_quoting(&self, cell: &str, quote: char) -> bool {
        if self.dialect.always_quote() {
            return true;
        }
        cell.contains(self.dialect.delimiter())
            || cell.contains('\r')
            || cell.contains('\n')
            || cell.contains(quote)
            || cell.starts_with(' ')
            || cell.ends_with(' ')
    }
}

fn write_char<W: Write>(sink: &mut W, c: char) -> CsvResult<()> {
    let mut utf8 = [0u8; 4];
    sink.write_all(c.encode_utf8(&mut utf8).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::CsvParser;

    fn print_row(cells: &[&str], dialect: Dialect) -> String {
        let mut printer = CsvPrinter::new(Vec::new(), dialect);
        printer.write_row(cells).unwrap();
        String::from_utf8(printer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn plain_cells_stay_unquoted() {
        assert_eq!(print_row(&["a", "b"], Dialect::rfc4180()), "a,b\n");
    }

    #[test]
    fn quote_doubling_doubles_every_internal_quote() {
        assert_eq!(
            print_row(&["say \"hi\" twice"], Dialect::rfc4180()),
            "\"say \"\"hi\"\" twice\"\n"
        );
    }

    #[test]
    fn leading_and_trailing_space_force_quoting() {
        assert_eq!(print_row(&[" a"], Dialect::rfc4180()), "\" a\"\n");
        assert_eq!(print_row(&["a "], Dialect::rfc4180()), "\"a \"\n");
    }

    #[test]
    fn tsv_rejects_unrepresentable_cells() {
        let mut printer = CsvPrinter::new(Vec::new(), Dialect::tsv());
        assert!(printer.write_row(&["a\tb"]).is_err());
        assert!(printer.write_row(&["a\nb"]).is_err());
    }

    #[test]
    fn printed_rows_tokenize_back_to_the_same_cells() {
        let cells = vec!["plain", "comma, inside", "quote \" inside", " padded "];
        for dialect in [Dialect::rfc4180(), Dialect::excel(), Dialect::json_csv()] {
            let text = print_row(
                &cells.iter().map(|s| *s).collect::<Vec<_>>(),
                dialect.clone(),
            );
            let parsed = CsvParser::from_str(&text, dialect).read_row().unwrap();
            assert_eq!(parsed.unwrap(), cells);
        }
    }
}
