//! MIME encoding and decoding utilities.
//!
//! Supports Base64 (with line wrapping for message bodies), Quoted-Printable,
//! and RFC 2047 header encoding.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

/// Maximum encoded line length for message bodies (RFC 2045).
const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64, broken into CRLF-terminated lines of at most
/// 76 characters.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = encode_base64(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2 + 2);

    // Base64 output is pure ASCII, so byte chunks are char boundaries.
    for chunk in encoded.as_bytes().chunks(MAX_LINE_LENGTH) {
        result.push_str(&String::from_utf8_lossy(chunk));
        result.push_str("\r\n");
    }

    result
}

/// Decodes Base64 data, ignoring embedded whitespace and line breaks.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Encodes text using Quoted-Printable encoding (RFC 2045).
///
/// Line breaks in the input (`\n` or `\r\n`) are kept as hard CRLF breaks;
/// long lines get soft breaks. Trailing whitespace before a break is encoded.
#[must_use]
pub fn encode_quoted_printable(text: &str) -> String {
    let mut result = String::new();
    let normalized = text.replace("\r\n", "\n");

    for (index, line) in normalized.split('\n').enumerate() {
        if index > 0 {
            result.push_str("\r\n");
        }
        encode_quoted_printable_line(line, &mut result);
    }

    result
}

fn encode_quoted_printable_line(line: &str, result: &mut String) {
    let bytes = line.as_bytes();
    let mut line_length = 0;

    for (index, byte) in bytes.iter().enumerate() {
        let is_last = index + 1 == bytes.len();
        let mut token = String::with_capacity(3);

        match byte {
            b'!'..=b'<' | b'>'..=b'~' => token.push(char::from(*byte)),
            b' ' | b'\t' if !is_last => token.push(char::from(*byte)),
            _ => {
                let _ = write!(token, "={byte:02X}");
            }
        }

        // Leave room for the soft break marker.
        if line_length + token.len() > MAX_LINE_LENGTH - 1 {
            result.push_str("=\r\n");
            line_length = 0;
        }

        result.push_str(&token);
        line_length += token.len();
    }
}

/// Decodes Quoted-Printable text (RFC 2045).
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences or the
/// decoded bytes are not UTF-8.
pub fn decode_quoted_printable(text: &str) -> Result<String> {
    let mut result = Vec::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut index = 0;

    while index < bytes.len() {
        let byte = bytes[index];
        if byte != b'=' {
            result.push(byte);
            index += 1;
            continue;
        }

        // Soft line break
        match bytes.get(index + 1..) {
            Some([b'\r', b'\n', ..]) => {
                index += 3;
                continue;
            }
            Some([b'\n', ..]) => {
                index += 2;
                continue;
            }
            _ => {}
        }

        let hex = bytes
            .get(index + 1..index + 3)
            .ok_or_else(|| Error::InvalidEncoding("Incomplete escape sequence".to_string()))?;
        let hex = std::str::from_utf8(hex)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
        let decoded = u8::from_str_radix(hex, 16)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
        result.push(decoded);
        index += 3;
    }

    String::from_utf8(result).map_err(Into::into)
}

/// Encodes a header value using RFC 2047 encoding.
///
/// Format: `=?charset?B?encoded-text?=`. Plain ASCII values without `=?`
/// sequences are returned unchanged.
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if text.chars().all(|c| c.is_ascii() && !c.is_control()) && !text.contains("=?") {
        return text.to_string();
    }

    let encoded = encode_base64(text.as_bytes());
    format!("=?{charset}?B?{encoded}?=")
}

/// Decodes an RFC 2047 encoded header value.
///
/// # Errors
///
/// Returns an error if the input looks encoded but is malformed.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let Some(inner) = text.strip_prefix("=?").and_then(|t| t.strip_suffix("?=")) else {
        return Ok(text.to_string());
    };

    let parts: Vec<&str> = inner.split('?').collect();
    let [_charset, encoding, encoded_text] = parts.as_slice() else {
        return Err(Error::InvalidEncoding("Invalid RFC 2047 format".to_string()));
    };

    match encoding.to_uppercase().as_str() {
        "B" => String::from_utf8(decode_base64(encoded_text)?).map_err(Into::into),
        "Q" => decode_quoted_printable(&encoded_text.replace('_', " ")),
        other => Err(Error::InvalidEncoding(format!("Unknown encoding: {other}"))),
    }
}
