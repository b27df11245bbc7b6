//! Pull-based row reading: header resolution, row-shape normalization, and
//! warning collection on top of the tokenizer.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use crate::config::CsvConfig;
use crate::encoding::{self, Charset};
use crate::error::{CsvError, CsvResult};
use crate::observe::{ReadContext, ReadObserver, ReadSeverity, severity_for_error};
use crate::record::{CsvWarning, Headers, Row, WarningKind, row_from_values};
use crate::syntax::{CsvParser, StrChars, Utf8CharReader};

/// Orchestrates the tokenizer into typed-shape [`Row`]s.
///
/// Header resolution priority: caller-supplied headers
/// ([`CsvReader::with_headers`]) > the first tokenized record (when the config
/// has a header) > synthesized `col0..colN-1` sized to the first data record.
/// When caller-supplied headers are combined with a has-header config, the
/// file's own header line is consumed and discarded.
///
/// Every row is normalized to the header width (the [`Row`] length invariant);
/// under the uniform-field-count policy each mismatch additionally records a
/// [`CsvWarning`] and notifies the observer, warnings accumulate per session
/// ([`CsvReader::warnings`] / [`CsvReader::take_warnings`]).
///
/// Holds mutable positional state; not shareable across threads without
/// external synchronization.
pub struct CsvReader<I> {
    parser: CsvParser<I>,
    config: CsvConfig,
    headers: Option<Arc<Headers>>,
    supplied: Option<Arc<Headers>>,
    // First data record held back while synthesizing headers from its width.
    pending: Option<(u64, Vec<String>)>,
    warnings: Vec<CsvWarning>,
    observer: Option<Arc<dyn ReadObserver>>,
    source: String,
    detected_charset: Option<Charset>,
}

impl CsvReader<StrChars> {
    /// Read from in-memory text.
    pub fn from_str(text: &str, config: CsvConfig) -> Self {
        let parser = CsvParser::from_str(text, config.dialect().clone());
        Self::with_parser(parser, config, "<memory>".to_string(), None)
    }

    /// Read from raw bytes: a BOM (if present) is detected and stripped, and
    /// the bytes are decoded under the BOM's charset or the configured one.
    pub fn from_bytes(bytes: &[u8], config: CsvConfig) -> CsvResult<Self> {
        let (text, detected) = encoding::decode_bytes(bytes, config.charset())?;
        let parser = CsvParser::from_str(&text, config.dialect().clone());
        Ok(Self::with_parser(
            parser,
            config,
            "<memory>".to_string(),
            Some(detected),
        ))
    }

    /// Read a file, honoring BOM and charset like [`CsvReader::from_bytes`].
    pub fn from_path(path: impl AsRef<Path>, config: CsvConfig) -> CsvResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let mut reader = Self::from_bytes(&bytes, config)?;
        reader.source = path.display().to_string();
        Ok(reader)
    }
}

impl<R: Read> CsvReader<Utf8CharReader<R>> {
    /// Read UTF-8 text from a blocking byte reader, buffered per the config's
    /// read buffer size. For non-UTF-8 charsets use [`CsvReader::from_bytes`].
    pub fn from_reader(reader: R, config: CsvConfig) -> Self {
        let parser = CsvParser::from_reader(
            reader,
            config.dialect().clone(),
            config.read_buffer_size(),
        );
        Self::with_parser(parser, config, "<reader>".to_string(), None)
    }
}

impl<I> CsvReader<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    fn with_parser(
        parser: CsvParser<I>,
        config: CsvConfig,
        source: String,
        detected_charset: Option<Charset>,
    ) -> Self {
        Self {
            parser,
            config,
            headers: None,
            supplied: None,
            pending: None,
            warnings: Vec::new(),
            observer: None,
            source,
            detected_charset,
        }
    }

    /// Supply headers up front, overriding any header record in the input.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.supplied = Some(Arc::new(headers));
        self
    }

    /// Attach an observer notified of warnings and failures.
    pub fn with_observer(mut self, observer: Arc<dyn ReadObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The policy in force.
    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Charset detected from a BOM (or fallen back to from config) when the
    /// reader was built from bytes; `None` for char-level sources.
    pub fn detected_charset(&self) -> Option<Charset> {
        self.detected_charset
    }

    /// Row-shape warnings accumulated so far, oldest first.
    pub fn warnings(&self) -> &[CsvWarning] {
        &self.warnings
    }

    /// Drain the accumulated warnings.
    pub fn take_warnings(&mut self) -> Vec<CsvWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// The resolved headers, reading the first record if necessary.
    pub fn headers(&mut self) -> CsvResult<&Headers> {
        self.ensure_headers()?;
        Ok(self.headers.as_ref().expect("headers resolved"))
    }

    /// Read the next logical row, or `None` at end of stream.
    pub fn read_row(&mut self) -> CsvResult<Option<Row>> {
        match self.read_row_inner() {
            Ok(row) => Ok(row),
            Err(e) => {
                self.notify_error(&e);
                Err(e)
            }
        }
    }

    /// Read every remaining row.
    pub fn read_all(&mut self) -> CsvResult<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.read_row()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// A forward-only, non-restartable iterator over the remaining rows.
    ///
    /// I/O and parse failures surface as `Some(Err(_))` items, since a pull
    /// iterator cannot propagate them any other way.
    pub fn rows(&mut self) -> CsvRows<'_, I> {
        CsvRows { reader: self }
    }

    fn read_row_inner(&mut self) -> CsvResult<Option<Row>> {
        self.ensure_headers()?;

        if let Some((line, record)) = self.pending.take() {
            return Ok(Some(self.normalize(record, line)));
        }

        loop {
            let line = self.parser.line();
            let record = match self.parser.read_row()? {
                Some(r) => r,
                None => return Ok(None),
            };
            if is_blank_record(&record) && self.config.skip_empty_lines() {
                continue;
            }
            return Ok(Some(self.normalize(record, line)));
        }
    }

    fn ensure_headers(&mut self) -> CsvResult<()> {
        if self.headers.is_some() {
            return Ok(());
        }

        if let Some(supplied) = self.supplied.take() {
            if self.config.has_header() {
                // The input's own header line is overridden; consume it.
                self.next_meaningful_record()?;
            }
            self.headers = Some(supplied);
            return Ok(());
        }

        if self.config.has_header() {
            match self.next_meaningful_record()? {
                Some((_, record)) => {
                    self.headers = Some(Arc::new(Headers::new(record)?));
                }
                None => {
                    return Err(CsvError::header(
                        "input is empty but a header row was expected",
                    ));
                }
            }
            return Ok(());
        }

        // Headerless: size synthesized headers to the first data record and
        // hold that record back for delivery.
        match self.next_meaningful_record()? {
            Some((line, record)) => {
                self.headers = Some(Arc::new(Headers::synthesized(record.len())));
                self.pending = Some((line, record));
            }
            None => {
                self.headers = Some(Arc::new(Headers::synthesized(0)));
            }
        }
        Ok(())
    }

    /// Next record that is not a skippable blank line, with its start line.
    fn next_meaningful_record(&mut self) -> CsvResult<Option<(u64, Vec<String>)>> {
        loop {
            let line = self.parser.line();
            match self.parser.read_row()? {
                Some(record) => {
                    if is_blank_record(&record) && self.config.skip_empty_lines() {
                        continue;
                    }
                    return Ok(Some((line, record)));
                }
                None => return Ok(None),
            }
        }
    }

    fn normalize(&mut self, mut record: Vec<String>, line: u64) -> Row {
        let headers = Arc::clone(self.headers.as_ref().expect("headers resolved"));
        let width = headers.len();

        if record.len() != width && self.config.effective_uniform() {
            let kind = if record.len() < width {
                WarningKind::TooFewFields
            } else {
                WarningKind::TooManyFields
            };
            let warning = CsvWarning {
                line,
                kind,
                message: format!(
                    "line {line}: record has {} fields, header has {width}",
                    record.len()
                ),
            };
            if let Some(obs) = self.observer.as_ref() {
                let ctx = ReadContext {
                    source: self.source.clone(),
                    line,
                };
                obs.on_warning(&ctx, &warning);
            }
            self.warnings.push(warning);
        }

        record.truncate(width);
        while record.len() < width {
            record.push(String::new());
        }

        let values = record.into_iter().map(Some).collect();
        row_from_values(headers, values)
    }

    fn notify_error(&self, error: &CsvError) {
        if let Some(obs) = self.observer.as_ref() {
            let ctx = ReadContext {
                source: self.source.clone(),
                line: self.parser.line(),
            };
            let severity = severity_for_error(error);
            let severity = if severity < ReadSeverity::Error {
                ReadSeverity::Error
            } else {
                severity
            };
            obs.on_error(&ctx, severity, error);
        }
    }
}

/// A physical blank line tokenizes to exactly one empty field.
fn is_blank_record(record: &[String]) -> bool {
    record.len() == 1 && record[0].is_empty()
}

/// Forward-only row iterator borrowed from a [`CsvReader`].
pub struct CsvRows<'a, I> {
    reader: &'a mut CsvReader<I>,
}

impl<I> Iterator for CsvRows<'_, I>
where
    I: Iterator<Item = io::Result<char>>,
{
    type Item = CsvResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}
