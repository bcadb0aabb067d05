//! Hex encoding of upload payloads.
//!
//! The device accepts firmware images and animation assets as an uppercase
//! hex string POSTed with a form-urlencoded content type; the hex alphabet
//! is already URL-safe so the body needs no further escaping. Each byte
//! becomes two characters, high nibble first.

use thiserror::Error;

/// Map a nibble (0-15) to its uppercase hex character.
///
/// Callers guarantee the range via masking/shifting; larger values are a
/// contract violation.
pub fn nibble_char(nibble: u8) -> char {
    debug_assert!(nibble <= 0xF);
    if nibble < 10 {
        (b'0' + nibble) as char
    } else {
        (b'A' + (nibble - 10)) as char
    }
}

/// Encode a byte sequence as an uppercase hex string.
///
/// Pure and deterministic; the output is exactly twice as long as the
/// input, and empty input yields an empty string.
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for &byte in data {
        out.push(nibble_char(byte >> 4));
        out.push(nibble_char(byte & 0x0F));
    }
    out
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexError {
    #[error("hex string has odd length {0}")]
    OddLength(usize),
    #[error("invalid hex character {0:?} at offset {1}")]
    InvalidChar(char, usize),
}

/// Decode a hex string back into bytes.
///
/// The device decodes uploads the same way on its end; both cases are
/// accepted, odd length or a character outside `0-9a-fA-F` is an error.
pub fn decode(s: &str) -> Result<Vec<u8>, HexError> {
    let bytes = s.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(HexError::OddLength(bytes.len()));
    }
    let mut out = Vec::with_capacity(bytes.len() / 2);
    for (i, pair) in bytes.chunks_exact(2).enumerate() {
        let hi = nibble_value(pair[0]).ok_or(HexError::InvalidChar(pair[0] as char, i * 2))?;
        let lo = nibble_value(pair[1]).ok_or(HexError::InvalidChar(pair[1] as char, i * 2 + 1))?;
        out.push(hi << 4 | lo);
    }
    Ok(out)
}

fn nibble_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
