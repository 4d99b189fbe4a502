//! Decode error types.

use std::fmt;
use thiserror::Error;

/// An error produced by the VLQ segment decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VlqError {
    /// A character outside the base64 alphabet.
    #[error("invalid base64 character {ch:?} at offset {offset}")]
    InvalidChar {
        /// The offending character.
        ch: char,
        /// Byte offset of the character within the token.
        offset: usize,
    },

    /// The token ended while a continuation bit was still set.
    #[error("unterminated continuation sequence")]
    UnterminatedContinuation,

    /// The decoded value does not fit in 32 bits.
    #[error("value does not fit in 32 bits")]
    Overflow,
}

/// An error that aborted building a reverse index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (generated line {line}, segment {segment})")]
pub struct DecodeError {
    /// The kind of error.
    pub kind: DecodeErrorKind,
    /// The 0-indexed generated line the failing segment sits on.
    pub line: u32,
    /// The 0-indexed position of the failing segment within its line.
    pub segment: usize,
}

impl DecodeError {
    /// Creates a new decode error.
    pub fn new(kind: DecodeErrorKind, line: u32, segment: usize) -> Self {
        Self {
            kind,
            line,
            segment,
        }
    }
}

/// The kind of decode error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    /// The VLQ decoder rejected a segment token.
    #[error("malformed segment `{token}`: {source}")]
    MalformedSegment {
        /// The raw segment token.
        token: String,
        /// Why the token could not be decoded.
        source: VlqError,
    },

    /// A segment decoded to a number of fields other than 1, 4 or 5.
    #[error("segment `{token}` has {count} fields, expected 1, 4 or 5")]
    InvalidFieldCount {
        /// The raw segment token.
        token: String,
        /// The number of decoded fields.
        count: usize,
    },

    /// An empty segment token, as in `AAAA,,CAAA` or a trailing comma.
    #[error("empty segment")]
    EmptySegment,

    /// An absolute position went negative or past `u32::MAX`.
    #[error("{field} out of range: {value}")]
    PositionOutOfRange {
        /// Which position field overflowed.
        field: PositionField,
        /// The absolute value after applying the delta.
        value: i64,
    },

    /// A source index with no entry in the `sources` table.
    #[error("source index {index} out of range ({len} sources)")]
    SourceIndexOutOfRange {
        /// The absolute index after applying the delta.
        index: i64,
        /// Length of the `sources` table.
        len: usize,
    },

    /// A name index with no entry in the `names` table.
    #[error("name index {index} out of range ({len} names)")]
    NameIndexOutOfRange {
        /// The absolute index after applying the delta.
        index: i64,
        /// Length of the `names` table.
        len: usize,
    },

    /// The input declares a source map version other than 3.
    #[error("unsupported source map version {0}, expected 3")]
    UnsupportedVersion(u32),
}

impl DecodeErrorKind {
    /// Returns true if a segment token itself could not be turned into a position.
    pub fn is_malformed_segment(&self) -> bool {
        matches!(
            self,
            Self::MalformedSegment { .. }
                | Self::InvalidFieldCount { .. }
                | Self::EmptySegment
                | Self::PositionOutOfRange { .. }
        )
    }

    /// Returns true if a source or name index had no table entry.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::SourceIndexOutOfRange { .. } | Self::NameIndexOutOfRange { .. }
        )
    }
}

/// A position field carried by a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionField {
    /// Column in the generated output.
    GeneratedColumn,
    /// Line in the original source.
    OriginalLine,
    /// Column in the original source.
    OriginalColumn,
}

impl fmt::Display for PositionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GeneratedColumn => "generated column",
            Self::OriginalLine => "original line",
            Self::OriginalColumn => "original column",
        })
    }
}
