//! Circular next/previous bookmark search.
//!
//! Pure functions over an ascending slice: no store, no buffer, no I/O.
//! Moving the cursor and flashing the target are the caller's job.

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl From<bool> for Direction {
    /// `true` is forward.
    fn from(forward: bool) -> Self {
        if forward {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

/// Finds the bookmark to jump to from `cursor_line`.
///
/// Forward returns the first bookmark strictly after the cursor, wrapping
/// to the first bookmark. Backward returns the last bookmark strictly
/// before the cursor, wrapping to the last one. When the wrap target is
/// the cursor line itself there is nowhere to go and `None` is returned.
///
/// `bookmarks` must be strictly ascending. An empty slice yields `None`.
///
/// # Example
/// ```
/// use waymark_core::{find_target, Direction};
///
/// assert_eq!(find_target(&[2, 5, 9], 5, Direction::Forward), Some(9));
/// assert_eq!(find_target(&[2, 5, 9], 9, Direction::Forward), Some(2));
/// assert_eq!(find_target(&[7], 7, Direction::Forward), None);
/// ```
pub fn find_target(bookmarks: &[usize], cursor_line: usize, direction: Direction) -> Option<usize> {
    let (&first, &last) = (bookmarks.first()?, bookmarks.last()?);

    match direction {
        Direction::Forward => {
            let after = bookmarks.partition_point(|&line| line <= cursor_line);
            match bookmarks.get(after) {
                Some(&line) => Some(line),
                None => (first != cursor_line).then_some(first),
            }
        }
        Direction::Backward => {
            let before = bookmarks.partition_point(|&line| line < cursor_line);
            match before.checked_sub(1) {
                Some(idx) => Some(bookmarks[idx]),
                None => (last != cursor_line).then_some(last),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use Direction::{Backward, Forward};

    const MARKS: [usize; 3] = [2, 5, 9];

    #[test]
    fn test_forward_to_next() {
        assert_eq!(find_target(&MARKS, 5, Forward), Some(9));
        assert_eq!(find_target(&MARKS, 3, Forward), Some(5));
        assert_eq!(find_target(&MARKS, 0, Forward), Some(2));
    }

    #[test]
    fn test_forward_wraps_to_first() {
        assert_eq!(find_target(&MARKS, 9, Forward), Some(2));
        assert_eq!(find_target(&MARKS, 40, Forward), Some(2));
    }

    #[test]
    fn test_backward_to_previous() {
        assert_eq!(find_target(&MARKS, 5, Backward), Some(2));
        assert_eq!(find_target(&MARKS, 40, Backward), Some(9));
    }

    #[test]
    fn test_backward_wraps_to_last() {
        assert_eq!(find_target(&MARKS, 2, Backward), Some(9));
        assert_eq!(find_target(&MARKS, 0, Backward), Some(9));
    }

    #[test]
    fn test_single_bookmark_under_cursor() {
        assert_eq!(find_target(&[7], 7, Forward), None);
        assert_eq!(find_target(&[7], 7, Backward), None);
    }

    #[test]
    fn test_single_bookmark_elsewhere() {
        assert_eq!(find_target(&[7], 3, Forward), Some(7));
        assert_eq!(find_target(&[7], 10, Forward), Some(7));
        assert_eq!(find_target(&[7], 3, Backward), Some(7));
    }

    #[test]
    fn test_empty_has_no_target() {
        assert_eq!(find_target(&[], 0, Forward), None);
        assert_eq!(find_target(&[], 0, Backward), None);
    }

    #[test]
    fn test_direction_from_bool() {
        assert_eq!(Direction::from(true), Forward);
        assert_eq!(Direction::from(false), Backward);
    }

    fn ascending() -> impl Strategy<Value = Vec<usize>> {
        proptest::collection::btree_set(0usize..200, 1..20)
            .prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        #[test]
        fn forward_is_smallest_greater_or_wrap(marks in ascending(), cursor in 0usize..220) {
            let expected = match marks.iter().copied().find(|&l| l > cursor) {
                Some(line) => Some(line),
                None if marks[0] == cursor => None,
                None => Some(marks[0]),
            };
            prop_assert_eq!(find_target(&marks, cursor, Forward), expected);
        }

        #[test]
        fn backward_is_largest_smaller_or_wrap(marks in ascending(), cursor in 0usize..220) {
            let last = marks[marks.len() - 1];
            let expected = match marks.iter().rev().copied().find(|&l| l < cursor) {
                Some(line) => Some(line),
                None if last == cursor => None,
                None => Some(last),
            };
            prop_assert_eq!(find_target(&marks, cursor, Backward), expected);
        }
    }
}
