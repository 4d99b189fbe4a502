//! Base64 VLQ decoding for source map segments.
//!
//! Each base64 digit carries five payload bits plus a continuation bit (`0x20`).
//! Digits are little-endian: the first digit holds the lowest bits. Once a value
//! is complete, its lowest bit is the sign and the remaining bits the magnitude.

use crate::error::VlqError;

const CONTINUATION_BIT: u8 = 0b10_0000;
const PAYLOAD_MASK: u8 = 0b01_1111;
/// Highest shift at which another digit may still start.
const MAX_SHIFT: u32 = 30;

/// Maps a base64 character to its 6-bit value.
#[inline]
fn decode_digit(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// A lazy decoder over the signed values of one segment token.
///
/// Stops after the first error.
#[derive(Debug, Clone)]
pub struct VlqValues<'a> {
    token: &'a str,
    offset: usize,
    failed: bool,
}

impl<'a> VlqValues<'a> {
    /// Creates a decoder over a single segment token.
    pub fn new(token: &'a str) -> Self {
        Self {
            token,
            offset: 0,
            failed: false,
        }
    }

    fn next_value(&mut self) -> Result<i64, VlqError> {
        let bytes = self.token.as_bytes();
        let mut value: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let Some(&byte) = bytes.get(self.offset) else {
                return Err(VlqError::UnterminatedContinuation);
            };
            let digit = decode_digit(byte).ok_or_else(|| VlqError::InvalidChar {
                ch: self.token[self.offset..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER),
                offset: self.offset,
            })?;
            self.offset += 1;

            if shift > MAX_SHIFT {
                return Err(VlqError::Overflow);
            }
            value |= u64::from(digit & PAYLOAD_MASK) << shift;
            shift += 5;

            if digit & CONTINUATION_BIT == 0 {
                break;
            }
        }

        if value > u64::from(u32::MAX) {
            return Err(VlqError::Overflow);
        }

        let magnitude = (value >> 1) as i64;
        Ok(if value & 1 == 1 { -magnitude } else { magnitude })
    }
}

impl Iterator for VlqValues<'_> {
    type Item = Result<i64, VlqError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.token.len() {
            return None;
        }
        let result = self.next_value();
        self.failed = result.is_err();
        Some(result)
    }
}

/// Decodes one segment token into its signed values.
///
/// A well-formed source map segment yields 1, 4 or 5 values; this function
/// does not enforce the count.
pub fn decode_segment(token: &str) -> Result<Vec<i64>, VlqError> {
    VlqValues::new(token).collect()
}
