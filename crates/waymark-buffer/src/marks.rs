//! Per-line marker state.
//!
//! ## Line Decorations Follow the Text
//!
//! A mark belongs to a line, not to a line *number*. When lines are
//! inserted above a marked line the mark moves down with it; when the
//! marked line is joined into the line above (its line break deleted)
//! the mark disappears, just like a line decoration in a host editor.
//!
//! `TextBuffer` calls [`LineMarks::lines_inserted`] and
//! [`LineMarks::lines_removed`] after every rope mutation so the set
//! never refers to a line that no longer exists.

use std::collections::BTreeSet;

/// The set of marked lines in a buffer, kept in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMarks {
    lines: BTreeSet<usize>,
}

impl LineMarks {
    /// Creates an empty mark set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `line` is marked.
    pub fn is_marked(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Marks or unmarks `line`. Returns true if the state changed.
    pub fn set(&mut self, line: usize, marked: bool) -> bool {
        if marked {
            self.lines.insert(line)
        } else {
            self.lines.remove(&line)
        }
    }

    /// Flips the state of `line` and returns the new state.
    pub fn toggle(&mut self, line: usize) -> bool {
        let marked = !self.is_marked(line);
        self.set(line, marked);
        marked
    }

    /// Iterates marked lines in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `count` new lines were inserted directly after `line`.
    ///
    /// Marks on `line` itself stay put; everything below shifts down.
    pub fn lines_inserted(&mut self, line: usize, count: usize) {
        if count == 0 {
            return;
        }
        let moved = self.lines.split_off(&(line + 1));
        self.lines.extend(moved.into_iter().map(|l| l + count));
    }

    /// The lines `line + 1 ..= line + count` were joined into `line`.
    ///
    /// Marks on the joined lines are dropped; everything below shifts up.
    pub fn lines_removed(&mut self, line: usize, count: usize) {
        if count == 0 {
            return;
        }
        let mut tail = self.lines.split_off(&(line + 1));
        let below = tail.split_off(&(line + count + 1));
        self.lines.extend(below.into_iter().map(|l| l - count));
    }
}

impl FromIterator<usize> for LineMarks {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}
