//! Escape sequences inside string literals.
//!
//! Encoding (used when writing) maps control characters, the backslash and
//! the single quote to escapes; everything else, including non-ASCII text, is
//! written unchanged:
//!
//! | Character | Written as |
//! |-----------|------------|
//! | BEL, BS, FF, LF, CR, TAB, VT | `\a \b \f \n \r \t \v` |
//! | `\` and `'` | `\\` and `\'` |
//! | DEL (0x7F) | `\x7f` |
//! | any other control below 0x20 | `\u00xx` |
//!
//! Decoding (used when reading) additionally accepts `\0`, `\"`, `\xHH`
//! (one raw byte), `\uHHHH` and `\u{H...}` (one code point, re-encoded as
//! UTF-8). Surrogate code points and values above `U+10FFFF` are rejected.

use crate::{Error, Result};
use std::fmt::Write;

/// Appends `s` to `out` with every character that needs it escaped.
///
/// The surrounding quotes are not written.
///
/// # Examples
///
/// ```rust
/// let mut out = String::new();
/// serde_jsrs::escape::escape_into(&mut out, "it's\n");
/// assert_eq!(out, "it\\'s\\n");
/// ```
pub fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\u{7F}' => out.push_str("\\x7f"),
            c if (c as u32) < 0x20 => {
                // Writing into a String cannot fail.
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
}

/// Returns `s` with every character that needs it escaped.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    escape_into(&mut out, s);
    out
}

/// Returns `true` if `key` can be written as an unquoted object key,
/// i.e. it matches `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::escape::is_bare_identifier;
///
/// assert!(is_bare_identifier("valid_id"));
/// assert!(!is_bare_identifier("2bad"));
/// assert!(!is_bare_identifier(""));
/// ```
#[must_use]
pub fn is_bare_identifier(key: &str) -> bool {
    let mut bytes = key.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[inline]
fn hex_digit(byte: u8) -> Option<u32> {
    (byte as char).to_digit(16)
}

fn read_hex(buf: &[u8], start: usize, len: usize) -> Option<u32> {
    let digits = buf.get(start..start + len)?;
    digits
        .iter()
        .try_fold(0u32, |acc, &b| Some(acc * 16 + hex_digit(b)?))
}

fn push_code_point(out: &mut Vec<u8>, code_point: u32, offset: usize) -> Result<()> {
    let ch = char::from_u32(code_point)
        .ok_or_else(|| Error::escape(offset, "Invalid Unicode code point"))?;
    let mut utf8 = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    Ok(())
}

/// Decodes one escape sequence.
///
/// `pos` is the index of the byte right after the backslash. The decoded
/// bytes are appended to `out` and the number of bytes consumed from `pos`
/// is returned. Error offsets point at the selector byte.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::escape::unescape_at;
///
/// let mut out = Vec::new();
/// assert_eq!(unescape_at(b"\\u0041", 1, &mut out).unwrap(), 5);
/// assert_eq!(out, b"A");
/// ```
pub fn unescape_at(buf: &[u8], pos: usize, out: &mut Vec<u8>) -> Result<usize> {
    let selector = *buf
        .get(pos)
        .ok_or_else(|| Error::syntax(pos, "Unterminated escape sequence"))?;

    let literal = match selector {
        b'a' => 0x07,
        b'b' => 0x08,
        b'f' => 0x0C,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'v' => 0x0B,
        b'0' => 0x00,
        b'\\' => b'\\',
        b'\'' => b'\'',
        b'"' => b'"',
        b'x' => {
            let byte = read_hex(buf, pos + 1, 2)
                .ok_or_else(|| Error::escape(pos, "Invalid hexadecimal escape sequence"))?;
            // The byte is taken as-is; the string is validated as UTF-8 once complete.
            out.push(byte as u8);
            return Ok(3);
        }
        b'u' if buf.get(pos + 1) == Some(&b'{') => {
            let digits_start = pos + 2;
            let digits = buf[digits_start..]
                .iter()
                .take_while(|b| b.is_ascii_hexdigit())
                .count();
            if digits == 0 || digits > 6 || buf.get(digits_start + digits) != Some(&b'}') {
                return Err(Error::escape(pos, "Invalid Unicode escape sequence"));
            }
            let code_point = read_hex(buf, digits_start, digits)
                .ok_or_else(|| Error::escape(pos, "Invalid Unicode escape sequence"))?;
            push_code_point(out, code_point, pos)?;
            return Ok(digits + 3);
        }
        b'u' => {
            let code_point = read_hex(buf, pos + 1, 4)
                .ok_or_else(|| Error::escape(pos, "Invalid Unicode escape sequence"))?;
            push_code_point(out, code_point, pos)?;
            return Ok(5);
        }
        _ => return Err(Error::escape(pos, "Invalid escape sequence")),
    };

    out.push(literal);
    Ok(1)
}
