use core::fmt;

/// A position in the scanned stream.
///
/// `index` counts bytes of the UTF-8 text the scanner works on, which differs
/// from the raw source offset for UTF-16/32 input or input with a byte order
/// mark. `line` and `column` are zero-based; columns count UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mark {
    /// Byte offset into the UTF-8 text.
    pub index: u32,
    /// Zero-based line.
    pub line: u32,
    /// Zero-based column, in bytes.
    pub column: u32,
}

impl Mark {
    /// Creates a mark.
    #[must_use]
    pub const fn new(index: u32, line: u32, column: u32) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    /// The same line, shifted by signed byte deltas.
    #[must_use]
    pub fn offset(self, index_delta: i32, column_delta: i32) -> Self {
        Self {
            index: self.index.saturating_add_signed(index_delta),
            line: self.line,
            column: self.column.saturating_add_signed(column_delta),
        }
    }
}

/// Formats as one-based `line:column`.
impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PositionTracker {
    index: u32,
    line: u32,
    column: u32,
}

impl PositionTracker {
    pub(crate) fn advance(&mut self, bytes: u32) {
        self.index = self.index.saturating_add(bytes);
        self.column = self.column.saturating_add(bytes);
    }

    /// Moves past a line break of `bytes` bytes.
    pub(crate) fn advance_line(&mut self, bytes: u32) {
        self.index = self.index.saturating_add(bytes);
        self.line = self.line.saturating_add(1);
        self.column = 0;
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark::new(self.index, self.line, self.column)
    }

    pub(crate) fn column(&self) -> u32 {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn tracks_lines_and_columns() {
        let mut tracker = PositionTracker::default();
        tracker.advance(3);
        assert_eq!(tracker.mark(), Mark::new(3, 0, 3));
        tracker.advance_line(2);
        assert_eq!(tracker.mark(), Mark::new(5, 1, 0));
        tracker.advance(1);
        assert_eq!(tracker.column(), 1);
        assert_eq!(tracker.mark().line, 1);
    }

    #[test]
    fn offsets_saturate() {
        let mark = Mark::new(4, 2, 1);
        assert_eq!(mark.offset(-1, -1), Mark::new(3, 2, 0));
        assert_eq!(mark.offset(-9, -9), Mark::new(0, 2, 0));
        assert_eq!(mark.to_string(), "3:2");
    }
}
