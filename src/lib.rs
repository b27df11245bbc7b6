//! `csv-dialects` reads and writes delimiter-separated text under
//! configurable dialects, and optionally coerces cell text to typed values
//! (string, integer, decimal, boolean, date/time) and back.
//!
//! The crate is built from three tightly coupled pieces:
//!
//! - [`syntax::CsvParser`]: a finite-state-machine tokenizer turning a
//!   character stream into rows of raw field strings under [`Dialect`] rules
//! - [`syntax::CsvPrinter`]: a dialect-aware serializer that is the
//!   tokenizer's exact inverse (round-trip fidelity)
//! - [`value`]: a closed set of field kinds ([`value::FieldType`]), each with
//!   parse/format rules, the numeric/temporal kinds driven by configurable
//!   specs
//!
//! On top sit [`CsvReader`] and [`CsvWriter`], which add header resolution,
//! row-shape normalization with warnings, empty-line policy, BOM/charset
//! handling, and bulk writing.
//!
//! ## Dialects
//!
//! Five presets are built in:
//!
//! - [`Dialect::rfc4180`]: strict RFC 4180 (`,`, `"`, `\n`)
//! - [`Dialect::excel`]: lenient Excel CSV (`,`, `"`, `\r\n`)
//! - [`Dialect::excel_semicolon`]: Excel with `;` delimiters
//! - [`Dialect::tsv`]: tabs, no quoting at all
//! - [`Dialect::json_csv`]: lenient quoting with `\` escapes
//!
//! Custom dialects are assembled with [`Dialect::builder`]; construction
//! validates the dialect invariants.
//!
//! ## Quick example: read rows
//!
//! ```rust
//! use csv_dialects::{CsvConfig, CsvReader, Dialect};
//!
//! # fn main() -> Result<(), csv_dialects::CsvError> {
//! let input = "id,name\n1,\"Smith, John\"\n2,Bob\n";
//! let mut reader = CsvReader::from_str(input, CsvConfig::new(Dialect::rfc4180()));
//!
//! assert_eq!(reader.headers()?.iter().collect::<Vec<_>>(), vec!["id", "name"]);
//! let rows = reader.read_all()?;
//! assert_eq!(rows[0].get_by_name("name"), Some(Some("Smith, John")));
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: write rows
//!
//! ```rust
//! use csv_dialects::{CsvConfig, CsvWriter, Dialect};
//!
//! # fn main() -> Result<(), csv_dialects::CsvError> {
//! let mut writer = CsvWriter::from_writer(Vec::new(), CsvConfig::new(Dialect::rfc4180()));
//! writer.write_header(&["id", "name"])?;
//! writer.write_row(&["1", "Smith, John"])?;
//! let bytes = writer.into_inner()?;
//! assert_eq!(bytes, b"id,name\n1,\"Smith, John\"\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Typed values
//!
//! ```rust
//! use csv_dialects::value::{DecimalSpec, FieldType, Value};
//!
//! let price = FieldType::Decimal(DecimalSpec::new(2));
//! // HALF_UP rounding to the configured scale.
//! assert_eq!(price.parse("1.235").unwrap(), price.parse("1.24").unwrap());
//! assert_eq!(price.parse("").unwrap(), Value::Null);
//! ```
//!
//! ## Modules
//!
//! - [`dialect`] / [`config`]: immutable syntax and policy descriptions
//! - [`syntax`]: the tokenizer/serializer pair and character plumbing
//! - [`record`]: headers, rows, row building, and shape warnings
//! - [`reader`] / [`writer`]: pull-based orchestration over the syntax layer
//! - [`value`]: typed field kinds and their specs
//! - [`encoding`]: BOM detection and charset decoding
//! - [`observe`]: observer hooks for read-side events
//! - [`error`]: the crate-wide error type
//!
//! Everything mutable (parser, reader, writer) is single-threaded; the
//! configuration and data-model types ([`Dialect`], [`CsvConfig`],
//! [`record::Headers`], [`record::Row`]) are immutable and freely shareable
//! once built.

pub mod config;
pub mod dialect;
pub mod encoding;
pub mod error;
pub mod observe;
pub mod reader;
pub mod record;
pub mod syntax;
pub mod value;
pub mod writer;

pub use config::{CsvConfig, CsvConfigBuilder};
pub use dialect::{Dialect, DialectBuilder};
pub use encoding::Charset;
pub use error::{CsvError, CsvResult};
pub use observe::{CompositeObserver, ReadContext, ReadObserver, ReadSeverity, StdErrObserver};
pub use reader::{CsvReader, CsvRows};
pub use record::{CsvWarning, Headers, Row, RowBuilder, WarningKind};
pub use writer::CsvWriter;
