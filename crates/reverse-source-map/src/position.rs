//! Line/column positions on both sides of a source map.

use smol_str::SmolStr;

/// A line and column position (0-indexed).
///
/// Ordering is line first, then column, which is the order the reverse index
/// stores original locations in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column.
    pub col: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// A position in the generated output that was derived from some original location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeneratedPosition {
    /// 0-indexed generated line.
    pub line: u32,
    /// 0-indexed generated column.
    pub col: u32,
    /// The symbolic name active at this position, if the segment carried one.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<SmolStr>,
}

impl GeneratedPosition {
    /// Creates a generated position without a name.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self {
            line,
            col,
            name: None,
        }
    }

    /// Attaches a symbolic name.
    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the generated line and column.
    #[inline]
    pub fn line_col(&self) -> LineCol {
        LineCol::new(self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_ordering() {
        assert!(LineCol::new(0, 10) < LineCol::new(1, 0));
        assert!(LineCol::new(2, 3) < LineCol::new(2, 4));
        assert_eq!(LineCol::new(5, 5), LineCol::new(5, 5));
    }

    #[test]
    fn test_generated_position_name() {
        let pos = GeneratedPosition::new(3, 7);
        assert_eq!(pos.name, None);
        assert_eq!(pos.line_col(), LineCol::new(3, 7));

        let named = pos.with_name("render");
        assert_eq!(named.name.as_deref(), Some("render"));
    }
}
