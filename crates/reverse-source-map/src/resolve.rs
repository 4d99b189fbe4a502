//! Resolution of source and name indices against the source map tables.

use crate::error::DecodeErrorKind;
use crate::position::LineCol;
use crate::segment::RawMapping;

/// Strips a query string from a source name.
///
/// Everything from the first `?` on is dropped, so `app.js?v=3` and `app.js`
/// share one entry in the reverse index. A literal `?` inside a file name is
/// truncated the same way.
pub fn normalize_source(source: &str) -> &str {
    source.split_once('?').map_or(source, |(path, _)| path)
}

/// A mapping whose indices have been replaced by table entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMapping<'a> {
    /// Normalized source name.
    pub source: &'a str,
    /// Position in the original source.
    pub original: LineCol,
    /// Position in the generated output.
    pub generated: LineCol,
    /// Symbolic name, if the segment carried one.
    pub name: Option<&'a str>,
}

/// Looks up source and name indices in the `sources` and `names` tables.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    sources: &'a [String],
    names: &'a [String],
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given tables.
    pub fn new(sources: &'a [String], names: &'a [String]) -> Self {
        Self { sources, names }
    }

    /// Returns the normalized source name at `index`.
    pub fn source(&self, index: i64) -> Result<&'a str, DecodeErrorKind> {
        lookup(self.sources, index)
            .map(|source| normalize_source(source))
            .ok_or(DecodeErrorKind::SourceIndexOutOfRange {
                index,
                len: self.sources.len(),
            })
    }

    /// Returns the symbolic name at `index`.
    pub fn name(&self, index: i64) -> Result<&'a str, DecodeErrorKind> {
        lookup(self.names, index)
            .map(String::as_str)
            .ok_or(DecodeErrorKind::NameIndexOutOfRange {
                index,
                len: self.names.len(),
            })
    }

    /// Resolves both indices of a raw mapping.
    pub fn resolve(&self, raw: RawMapping) -> Result<ResolvedMapping<'a>, DecodeErrorKind> {
        Ok(ResolvedMapping {
            source: self.source(raw.source)?,
            original: raw.original,
            generated: raw.generated,
            name: raw.name.map(|index| self.name(index)).transpose()?,
        })
    }
}

fn lookup(table: &[String], index: i64) -> Option<&String> {
    usize::try_from(index).ok().and_then(|index| table.get(index))
}
