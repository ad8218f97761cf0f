//! Core text buffer implementation using rope data structure.
//!
//! ## Why Rope?
//!
//! Line lookups (`line_to_char`, `char_to_line`) are O(log n) on a rope,
//! which is what keeps line marks cheap to maintain: every mutation asks
//! the rope which line it touched and how many line breaks it added or
//! removed, then shifts the marks accordingly.
//!
//! ## Learning: Ownership in Action
//!
//! ```rust,ignore
//! let buffer = TextBuffer::new();  // buffer OWNS the rope and the marks
//! let marks = buffer.marks();      // marks BORROWS from buffer
//! // buffer.insert(0, "x");        // ERROR! Can't mutate while borrowed
//! drop(marks);                     // Release borrow
//! buffer.insert(0, "x");           // Now OK!
//! ```

use ropey::Rope;
use std::ops::Range;
use std::path::Path;

use crate::marks::LineMarks;
use crate::{BufferError, BufferResult, Position};

/// A text buffer backed by a rope, carrying per-line marks.
///
/// # Thread Safety
///
/// `TextBuffer` is `Send` but not `Sync`: it is owned by the editor
/// thread and mutated through `&mut self` only.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,

    /// Marked lines, kept in step with the rope
    marks: LineMarks,

    /// Whether the buffer has unsaved changes
    modified: bool,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use waymark_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// assert_eq!(buffer.len_lines(), 1);
    /// ```
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            marks: LineMarks::new(),
            modified: false,
        }
    }

    /// Loads a buffer from a file.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        Ok(Self {
            rope: Rope::from_str(&content),
            marks: LineMarks::new(),
            modified: false,
        })
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    #[inline]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a specific line (0-indexed), including its line break.
    pub fn line(&self, line_idx: usize) -> BufferResult<std::borrow::Cow<'_, str>> {
        self.check_line(line_idx)?;
        Ok(self.rope.line(line_idx).into())
    }

    // ==================== Measurements ====================

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// An empty buffer has 1 line. A buffer ending with `\n` counts
    /// the empty line after it.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns the length of a specific line in characters.
    pub fn line_len(&self, line_idx: usize) -> BufferResult<usize> {
        self.check_line(line_idx)?;
        Ok(self.rope.line(line_idx).len_chars())
    }

    fn check_line(&self, line_idx: usize) -> BufferResult<()> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::LineOutOfBounds(line_idx));
        }
        Ok(())
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    ///
    /// Marks below the insertion line move down by the number of line
    /// breaks in `text`.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }

        let line = self.rope.char_to_line(char_idx);
        let lines_before = self.rope.len_lines();

        self.rope.insert(char_idx, text);
        self.marks
            .lines_inserted(line, self.rope.len_lines() - lines_before);
        self.modified = true;

        Ok(())
    }

    /// Inserts text at a line:column position.
    pub fn insert_at(&mut self, pos: Position, text: &str) -> BufferResult<()> {
        let char_idx = self.position_to_char_idx(pos)?;
        self.insert(char_idx, text)
    }

    /// Deletes text in a character range and returns it.
    ///
    /// Lines joined by the deletion lose their marks; marks below move up.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }

        let line = self.rope.char_to_line(range.start);
        let lines_before = self.rope.len_lines();
        let deleted: String = self.rope.slice(range.clone()).into();

        self.rope.remove(range);
        self.marks
            .lines_removed(line, lines_before - self.rope.len_lines());
        self.modified = true;

        Ok(deleted)
    }

    // ==================== Marks ====================

    /// Returns the marked lines.
    pub fn marks(&self) -> &LineMarks {
        &self.marks
    }

    /// Returns true if `line` is marked.
    pub fn is_marked(&self, line: usize) -> bool {
        self.marks.is_marked(line)
    }

    /// Marks or unmarks an existing line.
    pub fn set_marked(&mut self, line: usize, marked: bool) -> BufferResult<()> {
        self.check_line(line)?;
        self.marks.set(line, marked);
        Ok(())
    }

    /// Flips the mark on an existing line and returns the new state.
    pub fn toggle_mark(&mut self, line: usize) -> BufferResult<bool> {
        self.check_line(line)?;
        Ok(self.marks.toggle(line))
    }

    // ==================== Position Conversion ====================

    /// Converts a Position (line, column) to a character index.
    pub fn position_to_char_idx(&self, pos: Position) -> BufferResult<usize> {
        if pos.line >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        let line_start = self.rope.line_to_char(pos.line);
        let line_len = self.rope.line(pos.line).len_chars();

        // Allow column to be at end of line (for insertion)
        if pos.column > line_len {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        Ok(line_start + pos.column)
    }

    /// Converts a character index to a Position (line, column).
    pub fn char_idx_to_position(&self, char_idx: usize) -> BufferResult<Position> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }

        let line = self.rope.char_to_line(char_idx);
        let column = char_idx - self.rope.line_to_char(line);

        Ok(Position { line, column })
    }

    // ==================== State Queries ====================

    /// Returns true if the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            marks: LineMarks::new(),
            modified: false,
        }
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
