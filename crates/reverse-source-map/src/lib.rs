//! Reverse indexing of V3 source maps.
//!
//! A source map records, for each position in a generated file, the original
//! source location it came from. This crate decodes that mapping the other way
//! round: for every original `(source, line, column)` it collects the generated
//! positions derived from it, so a compiler can remap its own output through a
//! downstream tool's source map.
//!
//! # Example
//!
//! ```
//! use reverse_source_map::{build_reverse_index, GeneratedPosition, SourceMapInput};
//!
//! let input = SourceMapInput::new("AAAA;AACA", ["a.js"], Vec::<String>::new());
//! let index = build_reverse_index(&input).unwrap();
//!
//! assert_eq!(index.get("a.js", 1, 0), Some(&[GeneratedPosition::new(1, 0)][..]));
//! ```

mod decoder;
mod error;
mod input;
mod mappings;
mod position;
mod resolve;
mod reverse;
mod segment;
pub mod vlq;

pub use decoder::{decode_mappings, MappingDecoder};
pub use error::{DecodeError, DecodeErrorKind, PositionField, VlqError};
pub use input::SourceMapInput;
pub use mappings::{lines, LineGroup, Lines, Segments};
pub use position::{GeneratedPosition, LineCol};
pub use resolve::{normalize_source, ResolvedMapping, Resolver};
pub use reverse::{ReverseIndex, ReverseIndexBuilder};
pub use segment::{RawMapping, RunningState, Segment};

/// Options for decoding a source map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct DecodeOptions {
    /// Reject inputs that declare a version other than 3.
    pub check_version: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            check_version: true,
        }
    }
}

/// Builds the reverse index of a source map with default options.
pub fn build_reverse_index(input: &SourceMapInput) -> Result<ReverseIndex, DecodeError> {
    build_reverse_index_with_options(input, &DecodeOptions::default())
}

/// Builds the reverse index of a source map.
///
/// Decoding is all-or-nothing: the first malformed or empty segment, or the
/// first out-of-range index, fails the whole build.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(
        file = input.file.as_deref(),
        sources = input.sources.len(),
        names = input.names.len()
    )
)]
pub fn build_reverse_index_with_options(
    input: &SourceMapInput,
    options: &DecodeOptions,
) -> Result<ReverseIndex, DecodeError> {
    let result = build(input, options);
    match &result {
        Ok(index) => tracing::debug!(
            generated_lines = index.generated_line_count(),
            locations = index.len(),
            mappings = index.mapping_count(),
            "built reverse index"
        ),
        Err(error) => tracing::debug!(%error, "source map decode failed"),
    }
    result
}

fn build(input: &SourceMapInput, options: &DecodeOptions) -> Result<ReverseIndex, DecodeError> {
    if options.check_version {
        if let Some(version) = input.version.filter(|&version| version != 3) {
            return Err(DecodeError::new(
                DecodeErrorKind::UnsupportedVersion(version),
                0,
                0,
            ));
        }
    }

    let resolver = Resolver::new(&input.sources, &input.names);
    let mut builder = ReverseIndex::builder(&input.sources);
    let mut decoder = decode_mappings(&input.mappings);

    while let Some(raw) = decoder.next() {
        let mapping = resolver.resolve(raw?).map_err(|kind| {
            let (line, segment) = decoder.last_segment();
            DecodeError::new(kind, line, segment)
        })?;
        builder.insert(mapping);
    }

    Ok(builder.finish(decoder.generated_line_count()))
}
