//! Reader/writer behavior policy.
//!
//! [`CsvConfig`] wraps a [`Dialect`] with everything that is about *tables*
//! rather than *syntax*: header presence, uniform field counts, empty lines,
//! charset, BOM writing, and read buffering.

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::encoding::Charset;
use crate::error::{CsvError, CsvResult};

const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Immutable behavioral policy for [`crate::CsvReader`] / [`crate::CsvWriter`].
///
/// Build with [`CsvConfig::new`] for defaults or [`CsvConfig::builder`] to
/// adjust policy. A config with a header implicitly enforces uniform field
/// counts (see [`CsvConfig::effective_uniform`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvConfig {
    dialect: Dialect,
    has_header: bool,
    require_uniform_field_count: bool,
    skip_empty_lines: bool,
    charset: Charset,
    write_bom: bool,
    read_buffer_size: usize,
}

impl CsvConfig {
    /// Default policy over `dialect`: header expected, uniform field counts,
    /// empty lines skipped, UTF-8, no BOM on output, 8 KiB read buffer.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            has_header: true,
            require_uniform_field_count: true,
            skip_empty_lines: true,
            charset: Charset::Utf8,
            write_bom: false,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    /// Start building a policy over `dialect` (defaults as in [`CsvConfig::new`]).
    pub fn builder(dialect: Dialect) -> CsvConfigBuilder {
        CsvConfigBuilder {
            config: Self::new(dialect),
        }
    }

    /// The syntax dialect in force.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Whether the first record is a header row.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// The explicit uniform-field-count flag as configured.
    pub fn require_uniform_field_count(&self) -> bool {
        self.require_uniform_field_count
    }

    /// The uniform-field-count behavior actually in force: a header forces
    /// uniformity regardless of the explicit flag.
    pub fn effective_uniform(&self) -> bool {
        self.has_header || self.require_uniform_field_count
    }

    /// Whether physical blank lines produce no row at all.
    pub fn skip_empty_lines(&self) -> bool {
        self.skip_empty_lines
    }

    /// Charset used when decoding byte input (unless a BOM says otherwise).
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Whether the writer emits a BOM before any content.
    pub fn write_bom(&self) -> bool {
        self.write_bom
    }

    /// Buffer size used when reading from byte sources.
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }
}

/// Builder for [`CsvConfig`]; [`CsvConfigBuilder::build`] validates the
/// buffer-size invariant.
#[derive(Debug, Clone)]
pub struct CsvConfigBuilder {
    config: CsvConfig,
}

impl CsvConfigBuilder {
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.config.has_header = has_header;
        self
    }

    pub fn require_uniform_field_count(mut self, require: bool) -> Self {
        self.config.require_uniform_field_count = require;
        self
    }

    pub fn skip_empty_lines(mut self, skip: bool) -> Self {
        self.config.skip_empty_lines = skip;
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.config.charset = charset;
        self
    }

    pub fn write_bom(mut self, write_bom: bool) -> Self {
        self.config.write_bom = write_bom;
        self
    }

    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    pub fn build(self) -> CsvResult<CsvConfig> {
        if self.config.read_buffer_size == 0 {
            return Err(CsvError::config("read buffer size must be > 0"));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_forces_uniform_field_count() {
        let cfg = CsvConfig::builder(Dialect::rfc4180())
            .has_header(true)
            .require_uniform_field_count(false)
            .build()
            .unwrap();
        assert!(cfg.effective_uniform());

        let cfg = CsvConfig::builder(Dialect::rfc4180())
            .has_header(false)
            .require_uniform_field_count(false)
            .build()
            .unwrap();
        assert!(!cfg.effective_uniform());
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let err = CsvConfig::builder(Dialect::rfc4180())
            .read_buffer_size(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("buffer size"));
    }
}
