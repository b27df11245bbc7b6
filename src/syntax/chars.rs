//! Character sources with small-lookahead support.
//!
//! The tokenizer needs 1-2 characters of lookahead (CRLF collapsing, doubled
//! quotes), so [`CharSource`] layers a two-slot pushback buffer over any
//! fallible character iterator instead of requiring a pushback-capable stream.

use std::io::{self, BufReader, Read};

use crate::error::{CsvError, CsvResult};

/// A fallible character stream with a two-slot pushback buffer.
pub struct CharSource<I> {
    inner: I,
    // Pushed-back characters, most recently pushed last.
    pending: Vec<char>,
}

impl<I> CharSource<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            pending: Vec::with_capacity(2),
        }
    }

    /// Consume and return the next character, or `None` at end of stream.
    pub fn next(&mut self) -> CsvResult<Option<char>> {
        if let Some(c) = self.pending.pop() {
            return Ok(Some(c));
        }
        match self.inner.next() {
            Some(Ok(c)) => Ok(Some(c)),
            Some(Err(e)) => Err(CsvError::Io(e)),
            None => Ok(None),
        }
    }

    /// Look at the next character without consuming it.
    pub fn peek(&mut self) -> CsvResult<Option<char>> {
        if let Some(&c) = self.pending.last() {
            return Ok(Some(c));
        }
        match self.next()? {
            Some(c) => {
                self.push_back(c);
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }

    /// Push a character back; it will be returned by the next `next()` call.
    pub fn push_back(&mut self, c: char) {
        debug_assert!(self.pending.len() < 2, "lookahead deeper than 2");
        self.pending.push(c);
    }
}

/// Adapts a byte reader into an iterator of UTF-8 characters.
///
/// Decoding is strict: invalid or truncated UTF-8 surfaces as an
/// `InvalidData` I/O error. Reads are buffered with the configured capacity.
pub struct Utf8CharReader<R: Read> {
    inner: BufReader<R>,
}

impl<R: Read> Utf8CharReader<R> {
    pub fn new(reader: R, buffer_size: usize) -> Self {
        Self {
            inner: BufReader::with_capacity(buffer_size.max(1), reader),
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            return match self.inner.read(&mut byte) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => Err(e),
            };
        }
    }
}

impl<R: Read> Iterator for Utf8CharReader<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.read_byte() {
            Ok(Some(b)) => b,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };

        let width = match first {
            0x00..=0x7F => return Some(Ok(first as char)),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Some(Err(invalid_utf8())),
        };

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match self.read_byte() {
                Ok(Some(b)) if b & 0xC0 == 0x80 => *slot = b,
                Ok(_) => return Some(Err(invalid_utf8())),
                Err(e) => return Some(Err(e)),
            }
        }

        match std::str::from_utf8(&bytes[..width]) {
            Ok(s) => s.chars().next().map(Ok),
            Err(_) => Some(Err(invalid_utf8())),
        }
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream is not valid utf-8")
}

/// An owned character iterator over in-memory text.
pub struct StrChars {
    iter: std::vec::IntoIter<char>,
}

impl StrChars {
    pub fn new(text: &str) -> Self {
        Self {
            iter: text.chars().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl Iterator for StrChars {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushback_is_lifo_and_peek_does_not_consume() {
        let mut src = CharSource::new(StrChars::new("abc"));
        assert_eq!(src.peek().unwrap(), Some('a'));
        assert_eq!(src.next().unwrap(), Some('a'));
        let b = src.next().unwrap().unwrap();
        src.push_back(b);
        assert_eq!(src.next().unwrap(), Some('b'));
        assert_eq!(src.next().unwrap(), Some('c'));
        assert_eq!(src.next().unwrap(), None);
    }

    #[test]
    fn utf8_reader_decodes_multibyte_sequences() {
        let text = "héllo, wörld € 漢";
        let chars: Vec<char> = Utf8CharReader::new(text.as_bytes(), 4)
            .map(|c| c.unwrap())
            .collect();
        assert_eq!(chars.into_iter().collect::<String>(), text);
    }

    #[test]
    fn utf8_reader_rejects_truncated_sequences() {
        // First two bytes of a three-byte sequence.
        let bytes: &[u8] = &[0xE2, 0x82];
        let result: Result<Vec<char>, _> = Utf8CharReader::new(bytes, 16).collect();
        assert!(result.is_err());
    }
}
