//! Streaming decode of a mapping string into absolute mappings.

use std::iter::Enumerate;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::mappings::{self, Lines, Segments};
use crate::segment::{RawMapping, RunningState, Segment};

/// Decodes a mapping string into absolute mappings, in generated order.
///
/// Every segment yields one mapping. An empty segment token (`AAAA,,CAAA`)
/// is an error. The iterator stops after the first error.
pub fn decode_mappings(mappings: &str) -> MappingDecoder<'_> {
    MappingDecoder {
        lines: mappings::lines(mappings),
        current: None,
        state: RunningState::new(),
        line_count: 0,
        last_segment: (0, 0),
        done: false,
    }
}

/// Iterator returned by [`decode_mappings`].
#[derive(Debug, Clone)]
pub struct MappingDecoder<'a> {
    lines: Lines<'a>,
    /// The generated line being decoded and its remaining segments.
    current: Option<(u32, Enumerate<Segments<'a>>)>,
    state: RunningState,
    line_count: u32,
    /// Generated line and segment index of the last mapping yielded.
    last_segment: (u32, usize),
    done: bool,
}

impl MappingDecoder<'_> {
    /// Returns the number of generated lines entered so far.
    ///
    /// Once the iterator is exhausted without error this is the number of
    /// `;`-delimited groups in the mapping string.
    pub fn generated_line_count(&self) -> u32 {
        self.line_count
    }

    /// Returns the generated line and in-line segment index of the last
    /// mapping yielded.
    pub fn last_segment(&self) -> (u32, usize) {
        self.last_segment
    }

    fn fail(&mut self, kind: DecodeErrorKind, line: u32, segment: usize) -> DecodeError {
        self.done = true;
        DecodeError::new(kind, line, segment)
    }
}

impl Iterator for MappingDecoder<'_> {
    type Item = Result<RawMapping, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if self.current.is_none() {
                match self.lines.next() {
                    Some(group) => {
                        self.state.start_line();
                        self.line_count = group.index.saturating_add(1);
                        self.current = Some((group.index, group.segments().enumerate()));
                    }
                    None => self.done = true,
                }
                continue;
            }

            let Some((line, segments)) = self.current.as_mut() else {
                continue;
            };
            let line = *line;

            let Some((index, token)) = segments.next() else {
                self.current = None;
                continue;
            };

            if token.is_empty() {
                tracing::trace!(line, segment = index, "empty segment token");
                return Some(Err(self.fail(DecodeErrorKind::EmptySegment, line, index)));
            }

            return match Segment::parse(token).and_then(|segment| self.state.apply(line, segment)) {
                Ok(mapping) => {
                    self.last_segment = (line, index);
                    Some(Ok(mapping))
                }
                Err(kind) => Some(Err(self.fail(kind, line, index))),
            };
        }
    }
}
