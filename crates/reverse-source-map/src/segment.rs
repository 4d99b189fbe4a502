//! Segment classification and running delta state.

use crate::error::{DecodeErrorKind, PositionField};
use crate::position::LineCol;
use crate::vlq::VlqValues;

/// The relative fields carried by one segment token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// A generated column that reuses the running original location.
    Minimal {
        /// Generated column delta.
        gcol: i64,
    },
    /// A generated column with original location deltas.
    Full {
        /// Generated column delta.
        gcol: i64,
        /// Source index delta.
        source: i64,
        /// Original line delta.
        line: i64,
        /// Original column delta.
        col: i64,
    },
    /// A mapped generated column that also carries a symbolic name.
    Named {
        /// Generated column delta.
        gcol: i64,
        /// Source index delta.
        source: i64,
        /// Original line delta.
        line: i64,
        /// Original column delta.
        col: i64,
        /// Name index delta.
        name: i64,
    },
}

impl Segment {
    /// Decodes and classifies a segment token.
    pub fn parse(token: &str) -> Result<Self, DecodeErrorKind> {
        let mut fields = [0i64; 5];
        let mut count = 0usize;

        for value in VlqValues::new(token) {
            let value = value.map_err(|source| DecodeErrorKind::MalformedSegment {
                token: token.to_string(),
                source,
            })?;
            if let Some(slot) = fields.get_mut(count) {
                *slot = value;
            }
            count += 1;
        }

        let [gcol, source, line, col, name] = fields;
        match count {
            1 => Ok(Self::Minimal { gcol }),
            4 => Ok(Self::Full {
                gcol,
                source,
                line,
                col,
            }),
            5 => Ok(Self::Named {
                gcol,
                source,
                line,
                col,
                name,
            }),
            count => Err(DecodeErrorKind::InvalidFieldCount {
                token: token.to_string(),
                count,
            }),
        }
    }

    /// Returns the generated column delta, present on every segment.
    #[inline]
    pub fn gcol(&self) -> i64 {
        match *self {
            Self::Minimal { gcol } | Self::Full { gcol, .. } | Self::Named { gcol, .. } => gcol,
        }
    }
}

/// A decoded mapping with absolute positions and unresolved table indices.
///
/// Indices stay signed until they are checked against their tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMapping {
    /// Position in the generated output.
    pub generated: LineCol,
    /// Index into the `sources` table.
    pub source: i64,
    /// Position in the original source.
    pub original: LineCol,
    /// Index into the `names` table, if the segment carried a name.
    pub name: Option<i64>,
}

/// The absolute values accumulated across segments.
///
/// Only the generated column resets per generated line; the other fields
/// carry over for the whole mapping string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningState {
    gcol: i64,
    source: i64,
    line: i64,
    col: i64,
    name: i64,
}

impl RunningState {
    /// Creates a state with every field at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the generated column at the start of a generated line.
    #[inline]
    pub fn start_line(&mut self) {
        self.gcol = 0;
    }

    /// Applies a segment's deltas and returns the resulting absolute mapping.
    ///
    /// Fields the segment does not carry keep their running value. A
    /// [`Segment::Minimal`] therefore maps to the last original location seen.
    /// The mapping only has a name when the segment carried a name delta. On
    /// error the state is left as it was.
    pub fn apply(
        &mut self,
        generated_line: u32,
        segment: Segment,
    ) -> Result<RawMapping, DecodeErrorKind> {
        let mut next = *self;
        next.gcol += segment.gcol();

        let name = match segment {
            Segment::Minimal { .. } => None,
            Segment::Full {
                source, line, col, ..
            } => {
                next.source += source;
                next.line += line;
                next.col += col;
                None
            }
            Segment::Named {
                source,
                line,
                col,
                name,
                ..
            } => {
                next.source += source;
                next.line += line;
                next.col += col;
                next.name += name;
                Some(next.name)
            }
        };

        let generated = LineCol::new(
            generated_line,
            to_position(PositionField::GeneratedColumn, next.gcol)?,
        );
        let original = LineCol::new(
            to_position(PositionField::OriginalLine, next.line)?,
            to_position(PositionField::OriginalColumn, next.col)?,
        );

        *self = next;
        Ok(RawMapping {
            generated,
            source: next.source,
            original,
            name,
        })
    }
}

fn to_position(field: PositionField, value: i64) -> Result<u32, DecodeErrorKind> {
    u32::try_from(value).map_err(|_| DecodeErrorKind::PositionOutOfRange { field, value })
}
