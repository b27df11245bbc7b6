//! Bulk row writing: header emission, BOM, and flush-on-drop.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::CsvConfig;
use crate::encoding::Charset;
use crate::error::{CsvError, CsvResult};
use crate::record::{Headers, Row};
use crate::syntax::CsvPrinter;

/// Writes dialect-correct CSV text with header handling on top of
/// [`CsvPrinter`].
///
/// Output is always UTF-8; when the config enables BOM writing, a UTF-8 BOM
/// is emitted before any content. The underlying sink is flushed on every
/// exit path: explicitly via [`CsvWriter::flush`] / [`CsvWriter::into_inner`],
/// and best-effort on drop.
pub struct CsvWriter<W: Write> {
    // `None` only after `into_inner` has moved the sink out.
    printer: Option<CsvPrinter<W>>,
    config: CsvConfig,
    header_written: bool,
    started: bool,
}

impl CsvWriter<BufWriter<File>> {
    /// Write to a file, creating or truncating it.
    pub fn from_path(path: impl AsRef<Path>, config: CsvConfig) -> CsvResult<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file), config))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Write to an arbitrary sink.
    pub fn from_writer(sink: W, config: CsvConfig) -> Self {
        let printer = CsvPrinter::new(sink, config.dialect().clone());
        Self {
            printer: Some(printer),
            config,
            header_written: false,
            started: false,
        }
    }

    /// The policy in force.
    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Write the header row. May be called at most once; a second call fails
    /// with [`CsvError::Header`].
    ///
    /// Names are validated the same way parsed headers are (trimmed,
    /// non-blank, case-insensitively unique).
    pub fn write_header<S: AsRef<str>>(&mut self, names: &[S]) -> CsvResult<()> {
        if self.header_written {
            return Err(CsvError::header("header already written"));
        }
        let headers = Headers::new(names.iter().map(|s| s.as_ref()))?;
        self.ensure_bom()?;
        let names: Vec<&str> = headers.iter().collect();
        self.printer_mut().write_row(&names)?;
        self.header_written = true;
        Ok(())
    }

    /// Write one row of raw cells.
    pub fn write_row<S: AsRef<str>>(&mut self, cells: &[S]) -> CsvResult<()> {
        self.ensure_bom()?;
        self.printer_mut().write_row(cells)
    }

    /// Write a [`Row`], extracting its values in header order. Null cells are
    /// written as empty strings.
    pub fn write_record(&mut self, row: &Row) -> CsvResult<()> {
        let cells: Vec<&str> = row
            .values()
            .iter()
            .map(|v| v.as_deref().unwrap_or(""))
            .collect();
        self.write_row(&cells)
    }

    /// Write every row from a source.
    pub fn write_all_rows<'a, T>(&mut self, rows: T) -> CsvResult<()>
    where
        T: IntoIterator<Item = &'a Row>,
    {
        for row in rows {
            self.write_record(row)?;
        }
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> CsvResult<()> {
        self.printer_mut().flush()
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(mut self) -> CsvResult<W> {
        let printer = self.printer.take().expect("sink already taken");
        printer.into_inner()
    }

    fn ensure_bom(&mut self) -> CsvResult<()> {
        if !self.started {
            self.started = true;
            if self.config.write_bom() {
                self.printer_mut().write_raw(Charset::Utf8.bom())?;
            }
        }
        Ok(())
    }

    fn printer_mut(&mut self) -> &mut CsvPrinter<W> {
        self.printer.as_mut().expect("sink already taken")
    }
}

impl<W: Write> Drop for CsvWriter<W> {
    fn drop(&mut self) {
        if let Some(printer) = self.printer.as_mut() {
            let _ = printer.flush();
        }
    }
}
