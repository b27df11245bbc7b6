use thiserror::Error;

use crate::value::ValueError;

/// Convenience result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Error type returned across the crate.
///
/// This is a single error enum shared by the tokenizer, serializer, reader,
/// writer, and typed-value layers.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid dialect or reader/writer configuration.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Malformed quoting or structure in the input text. Fatal to the current
    /// `read_row` call; the stream position is unspecified afterwards.
    #[error("parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Header-related failure (duplicate/blank column names, row shape that
    /// cannot be bound to the headers, double header write).
    #[error("header error: {message}")]
    Header { message: String },

    /// A cell could not be parsed into or formatted from its field type.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Byte input could not be decoded under the requested or detected charset.
    #[error("charset error: {message}")]
    Charset { message: String },
}

impl CsvError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn header(message: impl Into<String>) -> Self {
        Self::Header {
            message: message.into(),
        }
    }

    pub(crate) fn charset(message: impl Into<String>) -> Self {
        Self::Charset {
            message: message.into(),
        }
    }
}
