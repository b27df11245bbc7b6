//! The syntax layer: tokenizer, serializer, and their character plumbing.
//!
//! - [`CsvParser`]: dialect-driven FSM tokenizer producing rows of raw fields
//! - [`CsvPrinter`]: its exact inverse, writing dialect-correct escaped text
//! - [`chars`]: lookahead character sources the tokenizer consumes

pub mod chars;
pub mod parser;
pub mod printer;

pub use chars::{CharSource, StrChars, Utf8CharReader};
pub use parser::CsvParser;
pub use printer::CsvPrinter;
