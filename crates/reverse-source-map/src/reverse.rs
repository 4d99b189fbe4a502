//! The original-to-generated reverse index.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;

use crate::position::{GeneratedPosition, LineCol};
use crate::resolve::{normalize_source, ResolvedMapping};

/// Normalized source names in first-appearance order. The position of a name
/// is its rank in the outer ordering of the index.
type SourceTable = IndexSet<SmolStr, FxBuildHasher>;

/// (source rank, original line, original column)
type Key = (usize, u32, u32);

fn source_range(rank: usize) -> RangeInclusive<Key> {
    (rank, 0, 0)..=(rank, u32::MAX, u32::MAX)
}

fn line_range(rank: usize, line: u32) -> RangeInclusive<Key> {
    (rank, line, 0)..=(rank, line, u32::MAX)
}

/// Maps original locations to every generated position derived from them.
///
/// Sources iterate in the order they first appear in the source map's
/// `sources` table; lines and columns iterate in ascending order. The
/// positions stored for one original location keep the order they were
/// decoded in (ascending generated line, then column).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseIndex {
    sources: SourceTable,
    entries: BTreeMap<Key, Vec<GeneratedPosition>>,
    generated_lines: u32,
    mapping_count: usize,
}

impl ReverseIndex {
    /// Creates a builder whose source ordering follows `sources`.
    pub fn builder<I, S>(sources: I) -> ReverseIndexBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ReverseIndexBuilder::new(sources)
    }

    /// Returns the generated positions for an original location.
    ///
    /// `source` is matched against normalized names, so it must not carry a
    /// query string.
    pub fn get(&self, source: &str, line: u32, col: u32) -> Option<&[GeneratedPosition]> {
        let rank = self.sources.get_index_of(source)?;
        self.entries.get(&(rank, line, col)).map(Vec::as_slice)
    }

    /// Returns the number of distinct original locations.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no original location is mapped.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the total number of generated positions stored.
    #[inline]
    pub fn mapping_count(&self) -> usize {
        self.mapping_count
    }

    /// Returns the number of generated lines in the decoded mapping string.
    #[inline]
    pub fn generated_line_count(&self) -> u32 {
        self.generated_lines
    }

    /// Returns every normalized source name in table order, mapped or not.
    pub fn source_table(&self) -> impl Iterator<Item = &str> + '_ {
        self.sources.iter().map(SmolStr::as_str)
    }

    /// Returns the sources that have at least one mapped location, in table order.
    pub fn sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.sources
            .iter()
            .enumerate()
            .filter(|(rank, _)| self.entries.range(source_range(*rank)).next().is_some())
            .map(|(_, source)| source.as_str())
    }

    /// Returns every entry in index order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, LineCol, &[GeneratedPosition])> + '_ {
        self.entries.iter().map(|(&(rank, line, col), positions)| {
            let source = self.sources.get_index(rank).map_or("", SmolStr::as_str);
            (source, LineCol::new(line, col), positions.as_slice())
        })
    }

    /// Returns the entries of one source, ordered by line then column.
    pub fn entries_for_source<'a>(
        &'a self,
        source: &str,
    ) -> impl Iterator<Item = (LineCol, &'a [GeneratedPosition])> + 'a {
        self.sources
            .get_index_of(source)
            .into_iter()
            .flat_map(move |rank| self.entries.range(source_range(rank)))
            .map(|(&(_, line, col), positions)| (LineCol::new(line, col), positions.as_slice()))
    }

    /// Returns the entries of one original line, ordered by column.
    pub fn entries_for_line<'a>(
        &'a self,
        source: &str,
        line: u32,
    ) -> impl Iterator<Item = (u32, &'a [GeneratedPosition])> + 'a {
        self.sources
            .get_index_of(source)
            .into_iter()
            .flat_map(move |rank| self.entries.range(line_range(rank, line)))
            .map(|(&(_, _, col), positions)| (col, positions.as_slice()))
    }
}

/// Accumulates resolved mappings into a [`ReverseIndex`].
///
/// Sources rank in `sources` table order. A mapping whose source is not in
/// the table gets a new rank after every source seen so far.
#[derive(Debug, Clone, Default)]
pub struct ReverseIndexBuilder {
    sources: SourceTable,
    entries: BTreeMap<Key, Vec<GeneratedPosition>>,
    mapping_count: usize,
}

impl ReverseIndexBuilder {
    /// Creates a builder, fixing the source order from a `sources` table.
    ///
    /// Names are normalized first; a name that normalizes to one already seen
    /// keeps the earlier rank.
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sources = sources
            .into_iter()
            .map(|source| SmolStr::new(normalize_source(source.as_ref())))
            .collect();
        Self {
            sources,
            entries: BTreeMap::new(),
            mapping_count: 0,
        }
    }

    /// Appends a mapping at its original location.
    pub fn insert(&mut self, mapping: ResolvedMapping<'_>) {
        let rank = match self.sources.get_index_of(mapping.source) {
            Some(rank) => rank,
            None => self.sources.insert_full(SmolStr::new(mapping.source)).0,
        };

        let position = GeneratedPosition {
            line: mapping.generated.line,
            col: mapping.generated.col,
            name: mapping.name.map(SmolStr::new),
        };
        self.entries
            .entry((rank, mapping.original.line, mapping.original.col))
            .or_default()
            .push(position);
        self.mapping_count += 1;
    }

    /// Builds the final index.
    pub fn finish(self, generated_lines: u32) -> ReverseIndex {
        ReverseIndex {
            sources: self.sources,
            entries: self.entries,
            generated_lines,
            mapping_count: self.mapping_count,
        }
    }
}

#[cfg(feature = "serde")]
mod ser {
    use super::*;
    use serde::ser::{Serialize, SerializeMap, Serializer};

    /// Serializes as `{ source: { line: { col: [positions] } } }` in index order.
    impl Serialize for ReverseIndex {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            for (rank, source) in self.sources.iter().enumerate() {
                if self.entries.range(source_range(rank)).next().is_none() {
                    continue;
                }
                map.serialize_entry(source.as_str(), &SourceEntries { index: self, rank })?;
            }
            map.end()
        }
    }

    struct SourceEntries<'a> {
        index: &'a ReverseIndex,
        rank: usize,
    }

    impl Serialize for SourceEntries<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            let mut last_line = None;
            for (&(_, line, _), _) in self.index.entries.range(source_range(self.rank)) {
                if last_line == Some(line) {
                    continue;
                }
                last_line = Some(line);
                let columns = LineEntries {
                    index: self.index,
                    rank: self.rank,
                    line,
                };
                map.serialize_entry(&line, &columns)?;
            }
            map.end()
        }
    }

    struct LineEntries<'a> {
        index: &'a ReverseIndex,
        rank: usize,
        line: u32,
    }

    impl Serialize for LineEntries<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            let entries = self.index.entries.range(line_range(self.rank, self.line));
            for (&(_, _, col), positions) in entries {
                map.serialize_entry(&col, positions)?;
            }
            map.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolved<'a>(
        source: &'a str,
        line: u32,
        col: u32,
        gline: u32,
        gcol: u32,
        name: Option<&'a str>,
    ) -> ResolvedMapping<'a> {
        ResolvedMapping {
            source,
            original: LineCol::new(line, col),
            generated: LineCol::new(gline, gcol),
            name,
        }
    }

    #[test]
    fn test_empty_index() {
        let index = ReverseIndex::builder(["a.js"]).finish(0);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.sources().count(), 0);
        assert_eq!(index.source_table().collect::<Vec<_>>(), vec!["a.js"]);
    }

    #[test]
    fn test_leaf_appends_in_insert_order() {
        let mut builder = ReverseIndex::builder(["a.js"]);
        builder.insert(resolved("a.js", 3, 4, 0, 10, None));
        builder.insert(resolved("a.js", 3, 4, 0, 2, Some("x")));
        builder.insert(resolved("a.js", 3, 4, 5, 0, None));
        let index = builder.finish(6);

        assert_eq!(
            index.get("a.js", 3, 4).unwrap(),
            &[
                GeneratedPosition::new(0, 10),
                GeneratedPosition::new(0, 2).with_name("x"),
                GeneratedPosition::new(5, 0),
            ]
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.mapping_count(), 3);
        assert_eq!(index.generated_line_count(), 6);
    }

    #[test]
    fn test_sources_follow_table_order() {
        let mut builder = ReverseIndex::builder(["z.js", "m.js", "a.js"]);
        builder.insert(resolved("a.js", 0, 0, 0, 0, None));
        builder.insert(resolved("z.js", 9, 0, 0, 1, None));
        builder.insert(resolved("a.js", 1, 0, 0, 2, None));
        let index = builder.finish(1);

        assert_eq!(index.sources().collect::<Vec<_>>(), vec!["z.js", "a.js"]);
        let keys: Vec<_> = index
            .entries()
            .map(|(source, original, _)| (source, original.line))
            .collect();
        assert_eq!(keys, vec![("z.js", 9), ("a.js", 0), ("a.js", 1)]);
    }

    #[test]
    fn test_lines_and_columns_ascend() {
        let mut builder = ReverseIndex::builder(["a.js"]);
        builder.insert(resolved("a.js", 2, 7, 0, 0, None));
        builder.insert(resolved("a.js", 0, 3, 0, 1, None));
        builder.insert(resolved("a.js", 2, 1, 0, 2, None));
        builder.insert(resolved("a.js", 10, 0, 0, 3, None));
        let index = builder.finish(1);

        let originals: Vec<_> = index.entries_for_source("a.js").map(|(pos, _)| pos).collect();
        assert_eq!(
            originals,
            vec![
                LineCol::new(0, 3),
                LineCol::new(2, 1),
                LineCol::new(2, 7),
                LineCol::new(10, 0),
            ]
        );

        let columns: Vec<_> = index.entries_for_line("a.js", 2).map(|(col, _)| col).collect();
        assert_eq!(columns, vec![1, 7]);
        assert_eq!(index.entries_for_line("a.js", 5).count(), 0);
    }

    #[test]
    fn test_query_normalized_duplicates_share_rank() {
        let mut builder = ReverseIndex::builder(["b.js", "foo.js?v=1", "foo.js?v=2"]);
        builder.insert(resolved("foo.js", 0, 0, 0, 0, None));
        let index = builder.finish(1);

        assert_eq!(
            index.source_table().collect::<Vec<_>>(),
            vec!["b.js", "foo.js"]
        );
        assert!(index.get("foo.js", 0, 0).is_some());
        assert!(index.get("foo.js?v=1", 0, 0).is_none());
    }

    #[test]
    fn test_unknown_source_ranks_last() {
        let mut builder = ReverseIndex::builder(["b.js"]);
        builder.insert(resolved("extra.js", 0, 0, 0, 0, None));
        builder.insert(resolved("later.js", 0, 0, 0, 1, None));
        builder.insert(resolved("b.js", 0, 0, 0, 2, None));
        builder.insert(resolved("extra.js", 1, 0, 0, 3, None));
        let index = builder.finish(1);

        assert_eq!(
            index.sources().collect::<Vec<_>>(),
            vec!["b.js", "extra.js", "later.js"]
        );
        assert_eq!(index.source_table().count(), 3);
        assert_eq!(index.mapping_count(), 4);
    }

    #[test]
    fn test_missing_lookups() {
        let mut builder = ReverseIndex::builder(["a.js"]);
        builder.insert(resolved("a.js", 1, 1, 0, 0, None));
        let index = builder.finish(1);

        assert!(index.get("a.js", 1, 2).is_none());
        assert!(index.get("b.js", 1, 1).is_none());
        assert_eq!(index.entries_for_source("b.js").count(), 0);
    }
}
