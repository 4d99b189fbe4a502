//! Splitting of the `mappings` string into generated lines and segment tokens.

use std::str::Split;

/// Returns the generated-line groups of a mapping string.
///
/// Groups are separated by `;`. An empty mapping string has no groups; any other
/// string has one more group than it has separators, so leading and trailing
/// empty groups are kept.
pub fn lines(mappings: &str) -> Lines<'_> {
    Lines {
        inner: (!mappings.is_empty()).then(|| mappings.split(';')),
        next_index: 0,
    }
}

/// Iterator over the generated-line groups of a mapping string.
///
/// Clone it before iterating to walk the groups a second time.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    inner: Option<Split<'a, char>>,
    next_index: u32,
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineGroup<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.inner.as_mut()?.next()?;
        let index = self.next_index;
        self.next_index = self.next_index.saturating_add(1);
        Some(LineGroup { index, text })
    }
}

/// The segments of one generated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineGroup<'a> {
    /// 0-indexed generated line.
    pub index: u32,
    text: &'a str,
}

impl<'a> LineGroup<'a> {
    /// Returns the raw text of this line group.
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Returns true if this generated line carries no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the comma-separated segment tokens of this line.
    ///
    /// A blank line yields no tokens. Empty tokens between commas are yielded
    /// as-is so the caller can decide whether to skip or reject them.
    pub fn segments(&self) -> Segments<'a> {
        Segments {
            inner: (!self.text.is_empty()).then(|| self.text.split(',')),
        }
    }
}

/// Iterator over the segment tokens of one generated line.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    inner: Option<Split<'a, char>>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn collect(mappings: &str) -> Vec<Vec<&str>> {
        lines(mappings)
            .map(|group| group.segments().collect())
            .collect()
    }

    #[test]
    fn test_empty_mappings() {
        assert_eq!(lines("").count(), 0);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(collect("AAAA,CAAC"), vec![vec!["AAAA", "CAAC"]]);
    }

    #[test]
    fn test_empty_groups_are_kept() {
        assert_eq!(collect(";"), vec![Vec::<&str>::new(), vec![]]);
        assert_eq!(
            collect(";;AAAA;"),
            vec![vec![], vec![], vec!["AAAA"], vec![]]
        );
    }

    #[test]
    fn test_line_indices() {
        let indices: Vec<u32> = lines("A;;C").map(|group| group.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_tokens_are_yielded() {
        assert_eq!(collect("AAAA,,CAAA"), vec![vec!["AAAA", "", "CAAA"]]);
    }

    #[test]
    fn test_restartable() {
        let groups = lines("AAAA;CAAA");
        let first: Vec<_> = groups.clone().map(|group| group.as_str()).collect();
        let second: Vec<_> = groups.map(|group| group.as_str()).collect();
        assert_eq!(first, second);
    }

    proptest! {
        /// A non-empty mapping string has one group per `;`-delimited field.
        #[test]
        fn group_count_matches_separators(mappings in "[A-Za-z0-9+/,;]{1,64}") {
            let separators = mappings.matches(';').count();
            prop_assert_eq!(lines(&mappings).count(), separators + 1);
        }
    }
}
