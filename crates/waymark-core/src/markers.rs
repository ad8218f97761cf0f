//! Access to a live buffer's per-line marker state.
//!
//! The host editor owns marker state; the bookmark core only reads it,
//! flips single lines, or applies a stored set when a buffer opens.
//! It never replaces the host's marks wholesale.

use waymark_buffer::TextBuffer;

/// Per-line "marked" flags on a live buffer.
pub trait LineMarkers {
    /// Returns true if `line` is marked.
    fn is_marked(&self, line: usize) -> bool;

    /// Marks or unmarks `line`. Lines past the end are ignored.
    fn set_marked(&mut self, line: usize, marked: bool);

    /// Number of lines currently in the buffer.
    fn line_count(&self) -> usize;

    /// Calls `visit` for every marked line.
    fn for_each_marked_line(&self, visit: &mut dyn FnMut(usize));

    /// Collects the marked lines.
    fn marked_lines(&self) -> Vec<usize> {
        let mut lines = Vec::new();
        self.for_each_marked_line(&mut |line| lines.push(line));
        lines
    }
}

impl LineMarkers for TextBuffer {
    fn is_marked(&self, line: usize) -> bool {
        TextBuffer::is_marked(self, line)
    }

    fn set_marked(&mut self, line: usize, marked: bool) {
        if let Err(err) = TextBuffer::set_marked(self, line, marked) {
            tracing::debug!("Ignoring mark on line {}: {}", line, err);
        }
    }

    fn line_count(&self) -> usize {
        self.len_lines()
    }

    fn for_each_marked_line(&self, visit: &mut dyn FnMut(usize)) {
        self.marks().iter().for_each(visit);
    }
}
