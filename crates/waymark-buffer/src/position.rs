//! Line/column positions inside a buffer.
//!
//! `Position` is a struct rather than a `(usize, usize)` tuple so a line
//! can never be passed where a column is expected.

/// A position in the text buffer (line and column).
///
/// Both line and column are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the document.
    pub const ZERO: Position = Position { line: 0, column: 0 };

    /// Position at the start of `line`.
    pub fn line_start(line: usize) -> Self {
        Self { line, column: 0 }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display as 1-indexed for user-facing output
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}
