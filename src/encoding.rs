//! Byte-order-mark detection and charset decoding.
//!
//! The syntax layer works on characters; this module turns raw bytes into a
//! `String` plus a [`Charset`] tag. Detection peeks at most 4 bytes: a BOM, if
//! present, wins over the requested charset and is stripped from the decoded
//! text. UTF-32 (both endiannesses) is decoded by hand since `encoding_rs`
//! does not ship a UTF-32 codec.

use serde::{Deserialize, Serialize};

use crate::error::{CsvError, CsvResult};

/// Character encodings the reader/writer understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    /// UTF-8 (the default).
    Utf8,
    /// UTF-16 little-endian.
    Utf16Le,
    /// UTF-16 big-endian.
    Utf16Be,
    /// UTF-32 little-endian.
    Utf32Le,
    /// UTF-32 big-endian.
    Utf32Be,
}

impl Default for Charset {
    fn default() -> Self {
        Self::Utf8
    }
}

impl Charset {
    /// Canonical label, e.g. `"utf-8"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
            Self::Utf32Le => "utf-32le",
            Self::Utf32Be => "utf-32be",
        }
    }

    /// The byte-order mark for this charset.
    pub fn bom(&self) -> &'static [u8] {
        match self {
            Self::Utf8 => &[0xEF, 0xBB, 0xBF],
            Self::Utf16Le => &[0xFF, 0xFE],
            Self::Utf16Be => &[0xFE, 0xFF],
            Self::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Self::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
        }
    }
}

/// Detect a BOM in the first bytes of `bytes`.
///
/// Returns the charset the mark identifies and the mark's length in bytes, or
/// `None` when no known mark is present. UTF-32 marks are checked before
/// UTF-16 marks (a UTF-32-LE BOM starts with the UTF-16-LE one).
pub fn detect_bom(bytes: &[u8]) -> Option<(Charset, usize)> {
    if bytes.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
        return Some((Charset::Utf32Le, 4));
    }
    if bytes.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        return Some((Charset::Utf32Be, 4));
    }
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some((Charset::Utf8, 3));
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Some((Charset::Utf16Le, 2));
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Some((Charset::Utf16Be, 2));
    }
    None
}

/// Decode `bytes` into text under `requested`, honoring any BOM.
///
/// Returns the decoded text (BOM stripped) and the charset actually used: the
/// BOM-detected one when a mark is present, otherwise `requested`.
pub fn decode_bytes(bytes: &[u8], requested: Charset) -> CsvResult<(String, Charset)> {
    let (charset, offset) = match detect_bom(bytes) {
        Some((cs, len)) => (cs, len),
        None => (requested, 0),
    };
    let body = &bytes[offset..];

    let text = match charset {
        Charset::Utf8 => {
            let (cow, _, had_errors) = encoding_rs::UTF_8.decode(body);
            if had_errors {
                return Err(CsvError::charset("input is not valid utf-8"));
            }
            cow.into_owned()
        }
        Charset::Utf16Le => {
            let (cow, _, had_errors) = encoding_rs::UTF_16LE.decode(body);
            if had_errors {
                return Err(CsvError::charset("input is not valid utf-16le"));
            }
            cow.into_owned()
        }
        Charset::Utf16Be => {
            let (cow, _, had_errors) = encoding_rs::UTF_16BE.decode(body);
            if had_errors {
                return Err(CsvError::charset("input is not valid utf-16be"));
            }
            cow.into_owned()
        }
        Charset::Utf32Le => decode_utf32(body, u32::from_le_bytes)?,
        Charset::Utf32Be => decode_utf32(body, u32::from_be_bytes)?,
    };

    Ok((text, charset))
}

fn decode_utf32(body: &[u8], to_u32: fn([u8; 4]) -> u32) -> CsvResult<String> {
    if body.len() % 4 != 0 {
        return Err(CsvError::charset(
            "utf-32 input length is not a multiple of 4",
        ));
    }
    let mut out = String::with_capacity(body.len() / 4);
    for unit in body.chunks_exact(4) {
        let code = to_u32([unit[0], unit[1], unit[2], unit[3]]);
        match char::from_u32(code) {
            Some(c) => out.push(c),
            None => {
                return Err(CsvError::charset(format!(
                    "invalid utf-32 code point 0x{code:08X}"
                )));
            }
        }
    }
    Ok(out)
}
