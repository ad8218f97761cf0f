//! # Waymark Buffer
//!
//! Rope-backed text buffer with per-line marks.
//!
//! ## Key Concepts
//!
//! ### Ownership & Borrowing
//! - `TextBuffer` owns both the rope and its `LineMarks`
//! - Reading marks borrows the buffer (`&self`)
//! - Any mutation, text or marks, needs `&mut self` (exclusive access)
//!
//! ### Marks Follow Text
//! - Inserting line breaks shifts marks below the edit down
//! - Deleting line breaks drops marks on the joined lines and shifts the rest up

mod buffer;
mod marks;
mod position;

pub use buffer::TextBuffer;
pub use marks::LineMarks;
pub use position::Position;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Position {line}:{column} is out of bounds")]
    PositionOutOfBounds { line: usize, column: usize },

    #[error("Line {0} is out of bounds")]
    LineOutOfBounds(usize),

    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(buffer: &TextBuffer) -> Vec<usize> {
        buffer.marks().iter().collect()
    }

    #[test]
    fn test_buffer_from_string() {
        let buffer = TextBuffer::from("Hello, World!");
        assert_eq!(buffer.len_chars(), 13);
        assert_eq!(buffer.text(), "Hello, World!");
    }

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello").unwrap();
        buffer.insert(5, ", World!").unwrap();
        assert_eq!(buffer.text(), "Hello, World!");

        buffer.delete(5..7).unwrap();
        assert_eq!(buffer.text(), "HelloWorld!");
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_line_operations() {
        let buffer = TextBuffer::from("Line 1\nLine 2\nLine 3");
        assert_eq!(buffer.len_lines(), 3);
        assert_eq!(buffer.line(0).unwrap(), "Line 1\n");
        assert_eq!(buffer.line(2).unwrap(), "Line 3");
        assert!(matches!(buffer.line(3), Err(BufferError::LineOutOfBounds(3))));
    }

    #[test]
    fn test_mark_out_of_bounds_is_rejected() {
        let mut buffer = TextBuffer::from("a\nb");
        assert!(buffer.set_marked(1, true).is_ok());
        assert!(buffer.set_marked(2, true).is_err());
        assert_eq!(marked(&buffer), vec![1]);
    }

    #[test]
    fn test_newline_above_mark_moves_it_down() {
        let mut buffer = TextBuffer::from("zero\none\ntwo\nthree");
        buffer.set_marked(2, true).unwrap();

        buffer.insert_at(Position::new(1, 0), "new\nlines\n").unwrap();

        assert_eq!(buffer.line(4).unwrap(), "two\n");
        assert_eq!(marked(&buffer), vec![4]);
    }

    #[test]
    fn test_edit_within_line_keeps_marks() {
        let mut buffer = TextBuffer::from("zero\none\ntwo");
        buffer.set_marked(1, true).unwrap();

        buffer.insert_at(Position::new(1, 3), "!!").unwrap();

        assert_eq!(marked(&buffer), vec![1]);
    }

    #[test]
    fn test_deleting_marked_line_drops_mark() {
        let mut buffer = TextBuffer::from("zero\none\ntwo\nthree");
        buffer.set_marked(1, true).unwrap();
        buffer.set_marked(3, true).unwrap();

        // Remove "one\n"
        let start = buffer.position_to_char_idx(Position::new(1, 0)).unwrap();
        let end = buffer.position_to_char_idx(Position::new(2, 0)).unwrap();
        // Join line 1 into line 0 by deleting the preceding line break too
        buffer.delete(start - 1..end - 1).unwrap();

        assert_eq!(buffer.text(), "zero\ntwo\nthree");
        assert_eq!(marked(&buffer), vec![2]);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(usize, String),
            Delete(usize, usize),
            Toggle(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (any::<usize>(), "[a-z\\n]{0,6}").prop_map(|(at, s)| Op::Insert(at, s)),
                (any::<usize>(), 0usize..8).prop_map(|(at, n)| Op::Delete(at, n)),
                any::<usize>().prop_map(Op::Toggle),
            ]
        }

        proptest! {
            #[test]
            fn marks_stay_within_buffer(ops in proptest::collection::vec(op(), 0..40)) {
                let mut buffer = TextBuffer::from("a\nb\nc\nd\n");
                for op in ops {
                    match op {
                        Op::Insert(at, text) => {
                            let at = at % (buffer.len_chars() + 1);
                            buffer.insert(at, &text).unwrap();
                        }
                        Op::Delete(at, n) => {
                            let at = at % (buffer.len_chars() + 1);
                            let end = (at + n).min(buffer.len_chars());
                            buffer.delete(at..end).unwrap();
                        }
                        Op::Toggle(line) => {
                            let line = line % buffer.len_lines();
                            buffer.toggle_mark(line).unwrap();
                        }
                    }
                    prop_assert!(buffer.marks().iter().all(|l| l < buffer.len_lines()));
                }
            }
        }
    }
}
